use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use flow_logging::flow_debug;
use outfitter_core::TargetId;
use outfitter_engine::{CredentialPrompt, ModalHandle, ModalHost, PageHost};

/// Renders the progress modal as indented terminal lines.
#[derive(Debug, Default)]
pub struct TerminalModal {
    next_handle: AtomicU64,
}

impl ModalHost for TerminalModal {
    fn open(&self, title: &str, body: &str) -> Option<ModalHandle> {
        println!("== {title} ==");
        println!("   {body}");
        Some(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn update(&self, _handle: ModalHandle, text: &str) {
        println!("   {text}");
    }

    fn close(&self, _handle: ModalHandle) {
        println!();
    }
}

/// Reads a credential from the terminal; an empty line cancels.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl CredentialPrompt for TerminalPrompt {
    async fn request(&self, _target: TargetId, error: Option<&str>) -> Option<String> {
        if let Some(error) = error {
            eprintln!("{error}");
        }
        tokio::task::spawn_blocking(read_credential_line)
            .await
            .ok()
            .flatten()
    }
}

fn read_credential_line() -> Option<String> {
    eprint!("Credential (empty line cancels): ");
    io::stderr().flush().ok()?;
    let mut buffer = String::new();
    io::stdin().lock().read_line(&mut buffer).ok()?;
    let entry = buffer.trim();
    if entry.is_empty() {
        None
    } else {
        Some(entry.to_string())
    }
}

/// Terminal rendition of the page capability: one virtual trigger per run.
pub struct CliPageHost {
    target: Mutex<Option<TargetId>>,
    anchor: AtomicBool,
}

impl CliPageHost {
    pub fn new(target: Option<TargetId>) -> Self {
        Self {
            target: Mutex::new(target),
            anchor: AtomicBool::new(false),
        }
    }
}

impl PageHost for CliPageHost {
    fn current_target(&self) -> Option<TargetId> {
        *self.target.lock().expect("page target lock")
    }

    fn has_trigger_anchor(&self) -> bool {
        self.anchor.load(Ordering::SeqCst)
    }

    fn install_trigger(&self, target: TargetId, attached: bool) {
        self.anchor.store(true, Ordering::SeqCst);
        let form = if attached { "remove" } else { "add" };
        println!("[page] {form} control available for {target}");
    }

    fn set_trigger_busy(&self, busy: bool) {
        flow_debug!("trigger busy: {busy}");
    }

    fn remove_trigger(&self) {
        self.anchor.store(false, Ordering::SeqCst);
        flow_debug!("trigger removed");
    }

    fn reset_trigger(&self) {
        flow_debug!("trigger reset");
    }

    fn schedule_rescan(&self) {
        flow_debug!("rescan requested");
    }
}
