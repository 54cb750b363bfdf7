use std::time::Duration;

/// Timing and validation knobs for the orchestration engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between consecutive job-status polls.
    pub poll_interval: Duration,
    /// Grace delay before releasing the surface after a successful job.
    pub done_close_delay: Duration,
    /// Grace delay before releasing the surface after a failed job.
    pub fail_close_delay: Duration,
    /// Pause between a mid-flight credential rejection and the re-prompt,
    /// letting the surface release settle first.
    pub reprompt_settle_delay: Duration,
    /// Wait slice while another credential prompt is still open.
    pub prompt_wait_slice: Duration,
    /// How many wait slices to spend before giving up on the open prompt.
    pub prompt_wait_tries: u32,
    /// Quiet period required before a burst of re-scan signals is evaluated.
    pub rescan_debounce: Duration,
    /// Required prefix for an entered credential; checked before submission.
    pub credential_prefix: String,
    /// Optional cap on total polling time for one job. `None` polls
    /// indefinitely, which is the observed and default behavior.
    pub poll_ceiling: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(600),
            done_close_delay: Duration::from_millis(2000),
            fail_close_delay: Duration::from_millis(2500),
            reprompt_settle_delay: Duration::from_millis(300),
            prompt_wait_slice: Duration::from_millis(250),
            prompt_wait_tries: 10,
            rescan_debounce: Duration::from_millis(200),
            credential_prefix: "ofk_".to_string(),
            poll_ceiling: None,
        }
    }
}
