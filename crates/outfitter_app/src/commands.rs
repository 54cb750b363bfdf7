use std::sync::Arc;

use anyhow::{bail, Context, Result};
use outfitter_core::{describe, FlowOutcome, StaticLocalizer, TargetId};
use outfitter_engine::{
    ChannelSettings, Debouncer, EngineConfig, FlowContext, FlowController, HttpChannel,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{Cli, Command};
use crate::hosts::{CliPageHost, TerminalModal, TerminalPrompt};

pub async fn dispatch(cli: Cli) -> Result<()> {
    let channel = HttpChannel::new(ChannelSettings::new(cli.backend_url.clone()))
        .with_context(|| format!("invalid backend url {}", cli.backend_url))?;
    let ctx = Arc::new(FlowContext::new(
        Arc::new(channel),
        EngineConfig::default(),
        Arc::new(TerminalPrompt),
        Arc::new(StaticLocalizer),
    ));

    match cli.command {
        Command::Add { target } => add(ctx, target).await,
        Command::Remove { target } => remove(ctx, target).await,
        Command::Status { target } => status(ctx, target).await,
        Command::List => list(ctx).await,
        Command::Key => key(ctx).await,
        Command::SetKey => set_key(ctx).await,
        Command::Watch { target } => watch(ctx, target).await,
    }
}

fn controller_for(ctx: &Arc<FlowContext>, target: TargetId) -> Arc<FlowController> {
    Arc::new(FlowController::new(
        ctx.clone(),
        Arc::new(CliPageHost::new(Some(target))),
        Arc::new(TerminalModal::default()),
    ))
}

async fn add(ctx: Arc<FlowContext>, target: TargetId) -> Result<()> {
    let controller = controller_for(&ctx, target);
    match controller.start_add(target).await {
        Some(FlowOutcome::Completed) => {
            println!("Content package attached for {target}.");
            Ok(())
        }
        Some(FlowOutcome::Failed { reason }) => bail!("add failed: {reason}"),
        Some(FlowOutcome::CredentialRenewed) => {
            println!("Credential updated. Run the command again to start the download.");
            Ok(())
        }
        Some(FlowOutcome::CredentialDeclined) => bail!("a valid credential is required"),
        Some(FlowOutcome::Cancelled) => {
            println!("Cancelled.");
            Ok(())
        }
        // A fresh controller has nothing in flight.
        None => Ok(()),
    }
}

async fn remove(ctx: Arc<FlowContext>, target: TargetId) -> Result<()> {
    let controller = controller_for(&ctx, target);
    match controller.start_remove(target).await {
        Some(true) => {
            println!("Content package detached for {target}.");
            Ok(())
        }
        Some(false) => bail!("remove failed; see the log for details"),
        None => Ok(()),
    }
}

async fn status(ctx: Arc<FlowContext>, target: TargetId) -> Result<()> {
    let response = ctx
        .client
        .job_status(target)
        .await
        .context("status query failed")?;
    if !response.success {
        bail!(
            "backend rejected the status query: {}",
            response.error.unwrap_or_else(|| "no detail".to_string())
        );
    }
    println!("{}", describe(&response.state, ctx.localizer.as_ref()));
    Ok(())
}

async fn list(ctx: Arc<FlowContext>) -> Result<()> {
    let targets = ctx
        .client
        .list_acquisitions()
        .await
        .context("list query failed")?;
    if targets.is_empty() {
        println!("No content packages attached.");
    }
    for target in targets {
        println!("{target}");
    }
    Ok(())
}

async fn key(ctx: Arc<FlowContext>) -> Result<()> {
    let status = ctx.gate.status(true).await;
    if status.has_credential {
        let validity = if status.is_valid { "valid" } else { "invalid" };
        println!("Credential {} ({validity})", status.masked_value);
    } else {
        println!("No credential stored.");
        if let Some(message) = status.message {
            println!("{message}");
        }
    }
    Ok(())
}

async fn set_key(ctx: Arc<FlowContext>) -> Result<()> {
    if ctx.gate.prompt_for_credential(TargetId::default()).await {
        println!("Credential stored.");
        Ok(())
    } else {
        bail!("credential entry cancelled")
    }
}

async fn watch(ctx: Arc<FlowContext>, target: TargetId) -> Result<()> {
    let controller = controller_for(&ctx, target);
    let debounce = ctx.config.rescan_debounce;
    let debouncer = Debouncer::spawn(debounce, {
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            async move { controller.evaluate_page().await }
        }
    });

    println!("Watching target {target}; every stdin line is a change signal (Ctrl-D stops).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while lines
        .next_line()
        .await
        .context("reading change signals")?
        .is_some()
    {
        debouncer.signal();
    }

    // Let a trailing burst settle before exiting.
    tokio::time::sleep(debounce * 2).await;
    Ok(())
}
