use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use flow_logging::{flow_debug, flow_info, flow_warn};
use outfitter_core::{FlowOutcome, Localize, MonitorOutcome, TargetId};
use tokio_util::sync::CancellationToken;

use crate::channel::BackendChannel;
use crate::client::BackendClient;
use crate::config::EngineConfig;
use crate::gate::CredentialGate;
use crate::host::{CredentialPrompt, ModalHost, PageHost};
use crate::monitor::ProgressMonitor;
use crate::surface::ProgressSurface;

/// Process-wide collaborators and shared state, created once at startup and
/// handed to every component by reference.
pub struct FlowContext {
    pub config: Arc<EngineConfig>,
    pub client: BackendClient,
    pub gate: Arc<CredentialGate>,
    pub localizer: Arc<dyn Localize>,
}

impl FlowContext {
    pub fn new(
        channel: Arc<dyn BackendChannel>,
        config: EngineConfig,
        prompt: Arc<dyn CredentialPrompt>,
        localizer: Arc<dyn Localize>,
    ) -> Self {
        let config = Arc::new(config);
        let client = BackendClient::new(channel);
        let gate = Arc::new(CredentialGate::new(
            client.clone(),
            config.clone(),
            prompt,
            localizer.clone(),
        ));
        Self {
            config,
            client,
            gate,
            localizer,
        }
    }
}

/// RAII permit over the single-flight flag. The flag is restored on every
/// exit path, including panics in collaborators.
struct FlightPermit<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightPermit<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates the add/remove flow for one trigger point.
///
/// The single-flight flag is scoped to this controller, not to the target
/// identifier: while any operation is in flight here, further trigger
/// activations are silent no-ops.
pub struct FlowController {
    ctx: Arc<FlowContext>,
    page: Arc<dyn PageHost>,
    modal: Arc<dyn ModalHost>,
    busy: AtomicBool,
    active: Mutex<Option<CancellationToken>>,
}

impl FlowController {
    pub fn new(ctx: Arc<FlowContext>, page: Arc<dyn PageHost>, modal: Arc<dyn ModalHost>) -> Self {
        Self {
            ctx,
            page,
            modal,
            busy: AtomicBool::new(false),
            active: Mutex::new(None),
        }
    }

    /// Runs the full gated add flow. Returns `None` when another operation
    /// on this trigger point is already in flight.
    pub async fn start_add(&self, target: TargetId) -> Option<FlowOutcome> {
        let Some(_permit) = FlightPermit::acquire(&self.busy) else {
            flow_debug!("add trigger for target {target} ignored: operation in flight");
            return None;
        };
        let cancel = CancellationToken::new();
        *self.active.lock().expect("active session lock") = Some(cancel.clone());
        let outcome = self.run_add(target, cancel).await;
        *self.active.lock().expect("active session lock") = None;
        Some(outcome)
    }

    async fn run_add(&self, target: TargetId, cancel: CancellationToken) -> FlowOutcome {
        let loc = self.ctx.localizer.as_ref();

        if !self.ctx.gate.ensure_valid(target).await {
            self.page.reset_trigger();
            return FlowOutcome::CredentialDeclined;
        }

        self.page.set_trigger_busy(true);
        let surface = ProgressSurface::open(
            self.modal.clone(),
            &loc.translate("flow.title"),
            &loc.translate("flow.starting"),
        );

        let start = match self.ctx.client.start_acquisition(target).await {
            Ok(response) => response,
            Err(err) => {
                flow_warn!("start request for target {target} failed: {err}");
                let reason = err.to_string();
                surface.update(&format!("{}: {reason}", loc.translate("flow.start_failed")));
                surface.close_after(self.ctx.config.fail_close_delay).await;
                self.page.reset_trigger();
                return FlowOutcome::Failed { reason };
            }
        };

        if start.requires_new_credential {
            // The job never started; re-prompt and leave the monitor out of it.
            self.ctx.gate.invalidate();
            surface.close_now();
            let renewed = self.ctx.gate.prompt_for_credential(target).await;
            self.page.reset_trigger();
            return if renewed {
                FlowOutcome::CredentialRenewed
            } else {
                FlowOutcome::CredentialDeclined
            };
        }

        if !start.success {
            let reason = start
                .error
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| loc.translate("flow.start_failed"));
            surface.update(&reason);
            surface.close_after(self.ctx.config.fail_close_delay).await;
            self.page.reset_trigger();
            return FlowOutcome::Failed { reason };
        }

        let monitor = ProgressMonitor::new(
            self.ctx.client.clone(),
            self.ctx.gate.clone(),
            self.ctx.config.clone(),
            self.ctx.localizer.clone(),
        );
        match monitor.run(target, surface, cancel).await {
            MonitorOutcome::Done => {
                flow_info!("add flow completed for target {target}");
                self.page.remove_trigger();
                self.page.schedule_rescan();
                FlowOutcome::Completed
            }
            MonitorOutcome::Failed { reason } => {
                self.page.reset_trigger();
                FlowOutcome::Failed { reason }
            }
            MonitorOutcome::CredentialRetry { renewed: true } => {
                self.page.reset_trigger();
                FlowOutcome::CredentialRenewed
            }
            MonitorOutcome::CredentialRetry { renewed: false } => {
                self.page.reset_trigger();
                FlowOutcome::Failed {
                    reason: loc.translate("credential.required"),
                }
            }
            MonitorOutcome::Cancelled => FlowOutcome::Cancelled,
        }
    }

    /// Issues the removal request. Returns `Some(true)` on success,
    /// `Some(false)` on failure, `None` when ignored because an operation
    /// is already in flight.
    pub async fn start_remove(&self, target: TargetId) -> Option<bool> {
        let Some(_permit) = FlightPermit::acquire(&self.busy) else {
            flow_debug!("remove trigger for target {target} ignored: operation in flight");
            return None;
        };
        self.page.set_trigger_busy(true);
        let removed = match self.ctx.client.remove_acquisition(target).await {
            Ok(ack) if ack.success => {
                flow_info!("removed content package for target {target}");
                self.page.remove_trigger();
                self.page.schedule_rescan();
                true
            }
            Ok(ack) => {
                flow_warn!(
                    "removal rejected for target {target}: {:?}",
                    ack.error.or(ack.message)
                );
                self.page.reset_trigger();
                false
            }
            Err(err) => {
                flow_warn!("removal request for target {target} failed: {err}");
                self.page.reset_trigger();
                false
            }
        };
        Some(removed)
    }

    /// Cancels the in-flight monitor session, if any. Called when the
    /// owning affordance disappears from the page.
    pub fn cancel_active(&self) {
        if let Some(token) = self.active.lock().expect("active session lock").as_ref() {
            token.cancel();
        }
    }

    /// Debounced page evaluation: places the trigger affordance for the
    /// current target. Idempotent: a no-op when the affordance is already
    /// present or no target is shown.
    pub async fn evaluate_page(&self) {
        let Some(target) = self.page.current_target() else {
            return;
        };
        if self.page.has_trigger_anchor() {
            return;
        }
        match self.ctx.client.has_acquisition(target).await {
            Ok(attached) => self.page.install_trigger(target, attached),
            Err(err) => {
                flow_debug!("page evaluation skipped for target {target}: {err}");
            }
        }
    }
}
