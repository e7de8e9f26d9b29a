//! Stop signal shared by the accepter tasks.

use tokio::sync::watch;

/// The sending half of the stop signal. Setting it is one-way.
#[derive(Debug)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    /// Create a signal in the running state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A new listener for this signal.
    pub fn subscribe(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every listener to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal was triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// The receiving half, one per accepter.
#[derive(Debug, Clone)]
pub struct StopListener {
    rx: watch::Receiver<bool>,
}

impl StopListener {
    /// Whether stop was requested.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until stop is requested. Returns immediately if it already was,
    /// or if the signal was dropped.
    pub async fn stopped(&mut self) {
        // An error means the sender is gone, which is treated as a stop
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
