//! One-shot "loading" flag shared between the backfill and its observers.

use tokio::sync::watch;

/// Starts out loading; [`finish`](Self::finish) clears it for good.
#[derive(Debug)]
pub struct LoadingFlag {
    tx: watch::Sender<bool>,
}

impl Default for LoadingFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingFlag {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx }
    }

    pub fn is_loading(&self) -> bool {
        *self.tx.borrow()
    }

    /// Clear the flag. Returns `true` only for the call that cleared it.
    pub fn finish(&self) -> bool {
        self.tx.send_if_modified(|loading| std::mem::replace(loading, false))
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Resolve once the flag has been cleared (immediately if it already is).
    pub async fn finished(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|loading| !*loading).await;
    }
}
