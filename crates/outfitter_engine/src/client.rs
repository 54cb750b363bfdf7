use std::sync::Arc;

use outfitter_core::{JobStatus, TargetId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::channel::{BackendChannel, ChannelError};

/// Typed wrappers over the string-keyed RPC channel.
#[derive(Clone)]
pub struct BackendClient {
    channel: Arc<dyn BackendChannel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialStatusResponse {
    pub success: bool,
    pub has_key: bool,
    pub is_valid: bool,
    pub masked_key: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AckResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartResponse {
    pub success: bool,
    pub requires_new_credential: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStatusResponse {
    pub success: bool,
    pub state: JobStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExistsResponse {
    success: bool,
    exists: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListResponse {
    success: bool,
    targets: Vec<TargetId>,
}

impl BackendClient {
    pub fn new(channel: Arc<dyn BackendChannel>) -> Self {
        Self { channel }
    }

    pub async fn credential_status(&self) -> Result<CredentialStatusResponse, ChannelError> {
        self.call_as("GetCredentialStatus", json!({})).await
    }

    pub async fn set_credential(&self, value: &str) -> Result<AckResponse, ChannelError> {
        self.call_as("SetCredential", json!({ "value": value })).await
    }

    pub async fn start_acquisition(&self, target: TargetId) -> Result<StartResponse, ChannelError> {
        self.call_as("StartAcquisition", json!({ "targetId": target }))
            .await
    }

    pub async fn job_status(&self, target: TargetId) -> Result<JobStatusResponse, ChannelError> {
        self.call_as("GetJobStatus", json!({ "targetId": target }))
            .await
    }

    pub async fn remove_acquisition(&self, target: TargetId) -> Result<AckResponse, ChannelError> {
        self.call_as("RemoveAcquisition", json!({ "targetId": target }))
            .await
    }

    pub async fn has_acquisition(&self, target: TargetId) -> Result<bool, ChannelError> {
        let response: ExistsResponse = self
            .call_as("HasAcquisition", json!({ "targetId": target }))
            .await?;
        Ok(response.success && response.exists)
    }

    pub async fn list_acquisitions(&self) -> Result<Vec<TargetId>, ChannelError> {
        let response: ListResponse = self.call_as("ListAcquisitions", json!({})).await?;
        Ok(response.targets)
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChannelError> {
        let value = self.channel.call(method, params).await?;
        serde_json::from_value(value).map_err(|err| ChannelError::Malformed(err.to_string()))
    }
}
