use std::sync::Arc;
use std::time::Duration;

use crate::host::{ModalHandle, ModalHost};

/// Scoped wrapper around one open modal.
///
/// Release is guaranteed: explicit close paths release immediately or after
/// a grace delay, and dropping an un-closed surface releases it too, so an
/// early return or panic in the flow never leaks an open modal.
pub struct ProgressSurface {
    host: Arc<dyn ModalHost>,
    handle: Option<ModalHandle>,
}

impl ProgressSurface {
    pub fn open(host: Arc<dyn ModalHost>, title: &str, body: &str) -> Self {
        let handle = host.open(title, body);
        Self { host, handle }
    }

    pub fn update(&self, text: &str) {
        if let Some(handle) = self.handle {
            self.host.update(handle, text);
        }
    }

    /// Releases the surface after a grace delay, giving the user time to
    /// read the final message.
    pub async fn close_after(mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        self.release();
    }

    pub fn close_now(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.host.close(handle);
        }
    }
}

impl Drop for ProgressSurface {
    fn drop(&mut self) {
        self.release();
    }
}
