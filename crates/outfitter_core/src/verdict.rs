use crate::{JobState, JobStatus};

/// Decision derived from one poll of the remote job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollVerdict {
    /// Non-terminal state: update the display and keep polling.
    Progress,
    /// Job finished successfully.
    Done,
    /// Job failed for a reason other than the credential.
    Failed { reason: String },
    /// The stored credential was rejected mid-flight.
    CredentialRejected,
}

/// Classifies a status payload into the monitor's next step.
pub fn classify(status: &JobStatus) -> PollVerdict {
    if status.needs_new_credential() {
        return PollVerdict::CredentialRejected;
    }
    match status.state() {
        JobState::Done => PollVerdict::Done,
        JobState::Failed => PollVerdict::Failed {
            reason: status
                .error
                .clone()
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| "job failed".to_string()),
        },
        _ => PollVerdict::Progress,
    }
}

/// Terminal result of one Progress Monitor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    Done,
    Failed { reason: String },
    /// Credential rejected mid-flight; `renewed` records whether the
    /// re-prompt produced an accepted replacement.
    CredentialRetry { renewed: bool },
    Cancelled,
}

/// Terminal result of one add flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Failed { reason: String },
    /// A replacement credential was accepted; the user re-triggers the flow.
    CredentialRenewed,
    /// The user declined to enter a credential.
    CredentialDeclined,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::{classify, PollVerdict};
    use crate::JobStatus;

    fn status(tag: &str) -> JobStatus {
        JobStatus {
            status: Some(tag.to_string()),
            ..JobStatus::default()
        }
    }

    #[test]
    fn auth_failed_is_credential_rejection() {
        assert_eq!(
            classify(&status("auth_failed")),
            PollVerdict::CredentialRejected
        );
    }

    #[test]
    fn failed_with_flag_is_credential_rejection() {
        let payload = JobStatus {
            requires_new_credential: Some(true),
            ..status("failed")
        };
        assert_eq!(classify(&payload), PollVerdict::CredentialRejected);
    }

    #[test]
    fn failed_without_flag_keeps_error_text() {
        let payload = JobStatus {
            error: Some("disk full".to_string()),
            ..status("failed")
        };
        assert_eq!(
            classify(&payload),
            PollVerdict::Failed {
                reason: "disk full".to_string()
            }
        );
    }

    #[test]
    fn intermediate_states_are_progress() {
        for tag in ["checking", "queued", "downloading", "installing", "weird"] {
            assert_eq!(classify(&status(tag)), PollVerdict::Progress);
        }
    }
}
