use std::sync::Arc;

use flow_logging::{flow_debug, flow_info};
use outfitter_core::{classify, describe, Localize, MonitorOutcome, PollVerdict, TargetId};
use tokio_util::sync::CancellationToken;

use crate::client::BackendClient;
use crate::config::EngineConfig;
use crate::gate::CredentialGate;
use crate::surface::ProgressSurface;

/// Polls a started remote job to completion and drives the progress
/// surface.
///
/// One monitor session is one cooperative task: it suspends on the poll
/// timer and on the cancellation token, and terminates by returning a
/// `MonitorOutcome`. Once it returns, no late timer fire or stale response
/// can touch the display again.
pub struct ProgressMonitor {
    client: BackendClient,
    gate: Arc<CredentialGate>,
    config: Arc<EngineConfig>,
    localizer: Arc<dyn Localize>,
}

impl ProgressMonitor {
    pub fn new(
        client: BackendClient,
        gate: Arc<CredentialGate>,
        config: Arc<EngineConfig>,
        localizer: Arc<dyn Localize>,
    ) -> Self {
        Self {
            client,
            gate,
            config,
            localizer,
        }
    }

    pub async fn run(
        &self,
        target: TargetId,
        surface: ProgressSurface,
        cancel: CancellationToken,
    ) -> MonitorOutcome {
        let started = tokio::time::Instant::now();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    flow_debug!("monitor for target {target} cancelled");
                    surface.close_now();
                    return MonitorOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            if let Some(ceiling) = self.config.poll_ceiling {
                if started.elapsed() >= ceiling {
                    let reason = "job exceeded the configured polling ceiling".to_string();
                    surface.update(&reason);
                    surface.close_after(self.config.fail_close_delay).await;
                    return MonitorOutcome::Failed { reason };
                }
            }

            let status = match self.client.job_status(target).await {
                Ok(response) if response.success => response.state,
                Ok(response) => {
                    // An error envelope from the status query is treated
                    // like a dropped poll, not a job failure.
                    flow_debug!(
                        "status query for target {target} returned an error envelope: {:?}",
                        response.error
                    );
                    continue;
                }
                Err(err) => {
                    flow_debug!("status poll for target {target} failed: {err}");
                    continue;
                }
            };

            match classify(&status) {
                PollVerdict::Progress => {
                    surface.update(&describe(&status, self.localizer.as_ref()));
                }
                PollVerdict::Done => {
                    flow_info!("acquisition finished for target {target}");
                    surface.update(&self.localizer.translate("progress.done"));
                    surface.close_after(self.config.done_close_delay).await;
                    return MonitorOutcome::Done;
                }
                PollVerdict::Failed { reason } => {
                    flow_info!("acquisition failed for target {target}: {reason}");
                    surface.update(&describe(&status, self.localizer.as_ref()));
                    surface.close_after(self.config.fail_close_delay).await;
                    return MonitorOutcome::Failed { reason };
                }
                PollVerdict::CredentialRejected => {
                    flow_info!("credential rejected mid-flight for target {target}");
                    surface.close_now();
                    self.gate.invalidate();
                    tokio::time::sleep(self.config.reprompt_settle_delay).await;
                    let renewed = self.gate.prompt_for_credential(target).await;
                    return MonitorOutcome::CredentialRetry { renewed };
                }
            }
        }
    }
}
