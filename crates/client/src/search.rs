//! Debounce timer primitive for live inputs.
//!
//! Search boxes and the live subdomain-availability check fire on every
//! keystroke; only the value that survives a quiet period should reach
//! the network. This is an explicit timer - each new input cancels the
//! previous one - rather than anything reactive.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default channel capacity for debounced values.
const CHANNEL_CAPACITY: usize = 8;

/// A restartable delay: [`Debouncer::input`] schedules the value for
/// delivery after the configured delay, cancelling whatever was pending.
/// Within a burst of inputs only the last value is delivered.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    tx: mpsc::Sender<String>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer and the receiving end for settled values.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Feed a new value: cancel the pending timer, start a fresh one.
    pub fn input(&mut self, value: impl Into<String>) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        let value = value.into();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means nobody wants the value anymore
            let _ = tx.send(value).await;
        }));
    }

    /// Cancel the pending delivery, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
