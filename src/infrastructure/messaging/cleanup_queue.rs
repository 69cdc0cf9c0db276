use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::cleanup_queue::{CleanupJob, CleanupQueue, CleanupQueueError};

/// Unbounded in-process queue for deferred session cleanups. The sending
/// half is shared with every orchestrator; the receiving half belongs to
/// the single cleanup worker.
pub struct MpscCleanupQueue {
    sender: mpsc::UnboundedSender<CleanupJob>,
}

pub struct CleanupReceiver {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<CleanupJob>>>,
}

impl MpscCleanupQueue {
    pub fn create_pair() -> (Self, CleanupReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();

        (
            Self { sender },
            CleanupReceiver {
                receiver: Arc::new(Mutex::new(receiver)),
            },
        )
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<CleanupJob> {
        self.sender.clone()
    }
}

impl CleanupReceiver {
    pub async fn recv(&self) -> Option<CleanupJob> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}

#[async_trait]
impl CleanupQueue for MpscCleanupQueue {
    async fn enqueue(&self, job: CleanupJob) -> Result<(), CleanupQueueError> {
        self.sender
            .send(job)
            .map_err(|_| CleanupQueueError::QueueClosed)
    }
}
