use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

/// Coalesces bursts of signals into a single evaluation.
///
/// Each signal resets the quiet-period timer; the action runs only once the
/// delay elapses with no further signal. Dropping the debouncer stops the
/// background task.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    pub fn spawn<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                loop {
                    tokio::select! {
                        more = rx.recv() => match more {
                            // Another signal within the quiet period: reset.
                            Some(()) => continue,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => {
                            action().await;
                            break;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    pub fn signal(&self) {
        let _ = self.tx.send(());
    }
}
