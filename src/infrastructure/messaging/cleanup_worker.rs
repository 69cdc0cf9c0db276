use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::ports::cleanup_queue::CleanupJob;
use crate::application::ports::vector_index::VectorIndex;
use crate::application::services::SessionLockRegistry;
use crate::infrastructure::messaging::cleanup_queue::CleanupReceiver;

const MAX_ATTEMPTS: u32 = 5;
const BASE_BACKOFF_SECS: u64 = 2;

/// Drains the cleanup queue, retrying failed ephemeral-session deletions
/// with multiplicative backoff. A job that exhausts its attempts is
/// logged at error level: a leaked session needs operator attention, it
/// cannot be silently dropped.
pub struct CleanupWorker {
    receiver: CleanupReceiver,
    requeue: mpsc::UnboundedSender<CleanupJob>,
    vector_index: Arc<dyn VectorIndex>,
    session_locks: Arc<SessionLockRegistry>,
}

impl CleanupWorker {
    pub fn new(
        receiver: CleanupReceiver,
        requeue: mpsc::UnboundedSender<CleanupJob>,
        vector_index: Arc<dyn VectorIndex>,
        session_locks: Arc<SessionLockRegistry>,
    ) -> Self {
        Self {
            receiver,
            requeue,
            vector_index,
            session_locks,
        }
    }

    pub async fn start(&self) {
        tracing::info!("Cleanup worker started");

        while let Some(job) = self.receiver.recv().await {
            self.process(job).await;
        }

        tracing::info!("Cleanup queue closed, worker stopping");
    }

    async fn process(&self, job: CleanupJob) {
        if job.attempts > 0 {
            let backoff = Duration::from_secs(BASE_BACKOFF_SECS.saturating_mul(
                2u64.saturating_pow(job.attempts - 1),
            ));
            tokio::time::sleep(backoff).await;
        }

        let result = {
            let _guard = self.session_locks.acquire(&job.session_id).await;
            self.vector_index.delete_by_session(&job.session_id).await
        };

        match result {
            Ok(deleted) => {
                tracing::info!(
                    "Background cleanup removed {} vector(s) for session '{}' (attempt {})",
                    deleted,
                    job.session_id,
                    job.attempts + 1
                );
            }
            Err(error) if job.attempts + 1 < MAX_ATTEMPTS => {
                tracing::warn!(
                    "Background cleanup failed for session '{}' (attempt {}): {}",
                    job.session_id,
                    job.attempts + 1,
                    error
                );
                if self.requeue.send(job.retry()).is_err() {
                    tracing::error!("Cleanup queue closed while requeueing");
                }
            }
            Err(error) => {
                tracing::error!(
                    "Giving up on cleanup for session '{}' after {} attempts: {}; \
                     session vectors are leaked and need manual deletion",
                    job.session_id,
                    MAX_ATTEMPTS,
                    error
                );
            }
        }
    }
}
