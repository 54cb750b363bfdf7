use outfitter_core::TargetId;

/// Opaque handle to an open modal, issued by the host environment.
pub type ModalHandle = u64;

/// Modal dialog primitive provided by the host environment.
///
/// Every operation must be safe to call after the backing element has been
/// removed externally; `open` may return `None` when no surface is
/// available, and the caller degrades to a silent display.
pub trait ModalHost: Send + Sync {
    fn open(&self, title: &str, body: &str) -> Option<ModalHandle>;
    fn update(&self, handle: ModalHandle, text: &str);
    fn close(&self, handle: ModalHandle);
}

/// Page-scanning and trigger-affordance capability.
///
/// The engine never touches the page directly; it asks the host what is on
/// it and tells the host how the trigger affordance should look.
pub trait PageHost: Send + Sync {
    /// Target identifier of the product currently shown, if any.
    fn current_target(&self) -> Option<TargetId>;
    /// Whether a trigger affordance is already placed for the current target.
    fn has_trigger_anchor(&self) -> bool;
    /// Place the trigger affordance; `attached` selects add vs remove form.
    fn install_trigger(&self, target: TargetId, attached: bool);
    /// Switch the affordance into or out of its busy-visual state.
    fn set_trigger_busy(&self, busy: bool);
    /// Remove the affordance after a completed operation.
    fn remove_trigger(&self);
    /// Restore the affordance's idle state after a failed operation.
    fn reset_trigger(&self);
    /// Ask the host to re-scan the page shortly.
    fn schedule_rescan(&self);
}

/// Interactive credential entry driver.
///
/// `error` carries the inline message from a prior rejected attempt so the
/// prompt can show it without closing. Returns `None` when the user
/// cancels.
#[async_trait::async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn request(&self, target: TargetId, error: Option<&str>) -> Option<String>;
}
