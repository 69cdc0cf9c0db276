use async_trait::async_trait;

#[derive(Debug)]
pub enum CleanupQueueError {
    QueueClosed,
}

impl std::fmt::Display for CleanupQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanupQueueError::QueueClosed => write!(f, "Cleanup queue is closed"),
        }
    }
}

impl std::error::Error for CleanupQueueError {}

/// A deferred deletion of one session's vectors. Re-enqueued with an
/// incremented attempt count until it succeeds or exhausts its budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupJob {
    pub session_id: String,
    pub attempts: u32,
}

impl CleanupJob {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            attempts: 0,
        }
    }

    pub fn retry(&self) -> Self {
        Self {
            session_id: self.session_id.clone(),
            attempts: self.attempts + 1,
        }
    }
}

/// Hand-off point for ephemeral-session cleanups that failed inline. A
/// leaked ephemeral session subverts the isolation invariant, so failed
/// deletions must be retried in the background rather than dropped.
#[async_trait]
pub trait CleanupQueue: Send + Sync {
    async fn enqueue(&self, job: CleanupJob) -> Result<(), CleanupQueueError>;
}
