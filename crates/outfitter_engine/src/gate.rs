use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use flow_logging::{flow_debug, flow_info, flow_warn};
use outfitter_core::{CredentialStatus, Localize, TargetId};

use crate::client::BackendClient;
use crate::config::EngineConfig;
use crate::host::CredentialPrompt;

/// Caches and validates the stored credential, and runs the interactive
/// replacement prompt when it is missing or rejected.
pub struct CredentialGate {
    client: BackendClient,
    config: Arc<EngineConfig>,
    prompt: Arc<dyn CredentialPrompt>,
    localizer: Arc<dyn Localize>,
    cache: Mutex<Option<CredentialStatus>>,
    prompt_open: AtomicBool,
}

impl CredentialGate {
    pub fn new(
        client: BackendClient,
        config: Arc<EngineConfig>,
        prompt: Arc<dyn CredentialPrompt>,
        localizer: Arc<dyn Localize>,
    ) -> Self {
        Self {
            client,
            config,
            prompt,
            localizer,
            cache: Mutex::new(None),
            prompt_open: AtomicBool::new(false),
        }
    }

    /// Returns the cached status unless a refresh is forced or no check has
    /// completed yet. A transport failure degrades to "no usable
    /// credential" and is cached, so repeated queries do not storm the
    /// backend.
    pub async fn status(&self, force_refresh: bool) -> CredentialStatus {
        if !force_refresh {
            let cached = self.cache.lock().expect("credential cache lock").clone();
            if let Some(status) = cached {
                if status.checked {
                    return status;
                }
            }
        }

        let status = match self.client.credential_status().await {
            Ok(response) => CredentialStatus {
                has_credential: response.has_key,
                is_valid: response.is_valid,
                masked_value: response.masked_key.unwrap_or_default(),
                message: response.message,
                checked: true,
            },
            Err(err) => {
                flow_warn!("credential status query failed: {err}");
                CredentialStatus::unavailable(err.to_string())
            }
        };

        *self.cache.lock().expect("credential cache lock") = Some(status.clone());
        status
    }

    /// Forces the next `status` call to query the backend again.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().expect("credential cache lock");
        if let Some(status) = cache.as_mut() {
            status.checked = false;
        }
    }

    /// True immediately when a valid credential is already stored; otherwise
    /// runs the interactive prompt and reports its outcome.
    pub async fn ensure_valid(&self, target: TargetId) -> bool {
        if self.status(false).await.is_usable() {
            return true;
        }
        self.prompt_for_credential(target).await
    }

    /// Runs the interactive credential prompt. At most one prompt is open
    /// system-wide; a second caller waits a bounded number of slices for the
    /// first to close, then gives up.
    pub async fn prompt_for_credential(&self, target: TargetId) -> bool {
        if !self.begin_prompt().await {
            flow_debug!("credential prompt already open; giving up for target {target}");
            return false;
        }
        let accepted = self.run_prompt(target).await;
        self.prompt_open.store(false, Ordering::SeqCst);
        accepted
    }

    async fn begin_prompt(&self) -> bool {
        if self.try_claim_prompt() {
            return true;
        }
        for _ in 0..self.config.prompt_wait_tries {
            tokio::time::sleep(self.config.prompt_wait_slice).await;
            if self.try_claim_prompt() {
                return true;
            }
        }
        false
    }

    fn try_claim_prompt(&self) -> bool {
        self.prompt_open
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Inner prompt loop: rejected entries surface their error inline and
    /// retry within the same prompt; cancellation leaves the cache untouched.
    async fn run_prompt(&self, target: TargetId) -> bool {
        let mut inline_error: Option<String> = None;
        loop {
            let entry = match self.prompt.request(target, inline_error.as_deref()).await {
                Some(entry) => entry.trim().to_string(),
                None => return false,
            };

            if entry.is_empty() {
                inline_error = Some(self.localizer.translate("credential.empty"));
                continue;
            }
            if !entry.starts_with(&self.config.credential_prefix) {
                inline_error = Some(self.localizer.translate("credential.bad_prefix"));
                continue;
            }

            match self.client.set_credential(&entry).await {
                Ok(ack) if ack.success => {
                    flow_info!("replacement credential accepted for target {target}");
                    self.invalidate();
                    return true;
                }
                Ok(ack) => {
                    inline_error = Some(
                        ack.message
                            .or(ack.error)
                            .filter(|text| !text.is_empty())
                            .unwrap_or_else(|| self.localizer.translate("credential.rejected")),
                    );
                }
                Err(err) => {
                    flow_warn!("credential submission failed: {err}");
                    inline_error = Some(err.to_string());
                }
            }
        }
    }
}
