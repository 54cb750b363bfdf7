/// Snapshot of the stored credential's state, cached process-wide.
///
/// `is_valid` carries no meaning while `has_credential` is false. `checked`
/// marks that a backend query has completed (successfully or not); a cached
/// snapshot is reused until it is invalidated or a refresh is forced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStatus {
    pub has_credential: bool,
    pub is_valid: bool,
    pub masked_value: String,
    pub message: Option<String>,
    pub checked: bool,
}

impl CredentialStatus {
    /// Degraded status after a transport failure: no usable credential, but
    /// marked checked so repeated queries do not storm the backend.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            has_credential: false,
            is_valid: false,
            masked_value: String::new(),
            message: Some(message.into()),
            checked: true,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.has_credential && self.is_valid
    }
}
