use serde::Deserialize;

/// Identifier of the product the content package belongs to.
pub type TargetId = u32;

/// Recognized job states as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Checking,
    CheckingAvailability,
    Queued,
    Downloading,
    Processing,
    Extracting,
    Installing,
    Done,
    Failed,
    AuthFailed,
    Unknown,
}

/// Latest status payload for a remote acquisition job.
///
/// Every field is optional: the backend reports only what the current state
/// knows about, and malformed payloads must still be representable. The raw
/// `status` tag is kept verbatim so unrecognized states can still be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStatus {
    pub status: Option<String>,
    pub bytes_read: Option<u64>,
    pub total_bytes: Option<u64>,
    pub file_count: Option<u32>,
    pub installed_files: Option<Vec<String>>,
    pub installed_path: Option<String>,
    pub endpoint: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub requires_new_credential: Option<bool>,
}

impl JobStatus {
    /// Maps the raw status tag onto a recognized state.
    pub fn state(&self) -> JobState {
        match self.status.as_deref() {
            Some("checking") => JobState::Checking,
            Some("checking_availability") => JobState::CheckingAvailability,
            Some("queued") => JobState::Queued,
            Some("downloading") => JobState::Downloading,
            Some("processing") => JobState::Processing,
            Some("extracting") => JobState::Extracting,
            Some("installing") => JobState::Installing,
            Some("done") => JobState::Done,
            Some("failed") => JobState::Failed,
            Some("auth_failed") => JobState::AuthFailed,
            _ => JobState::Unknown,
        }
    }

    /// True when the payload signals that the stored credential was rejected
    /// mid-flight and a new one must be entered.
    pub fn needs_new_credential(&self) -> bool {
        match self.state() {
            JobState::AuthFailed => true,
            JobState::Failed => self.requires_new_credential == Some(true),
            _ => false,
        }
    }
}
