//! Single primary-loop executor

use guildlink_core::{MainTask, MainThread};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs posted tasks one at a time, in posting order, on one tokio task.
///
/// Clones share the same loop. The loop ends once every handle is dropped.
#[derive(Debug, Clone)]
pub struct MainLoop {
    tx: mpsc::UnboundedSender<MainTask>,
}

impl MainLoop {
    /// Spawn the loop on the current runtime
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MainTask>();

        let handle = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                task();
            }
            debug!("Main loop stopped");
        });

        (Self { tx }, handle)
    }

    /// Wait until every task posted before this call has run
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.post(Box::new(move || {
            let _ = done_tx.send(());
        }));
        let _ = done_rx.await;
    }
}

impl MainThread for MainLoop {
    fn post(&self, task: MainTask) {
        if self.tx.send(task).is_err() {
            warn!("Main loop is gone, dropping task");
        }
    }
}
