use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-session advisory locks. Destructive session operations (cascade
/// deletes, ephemeral cleanup) hold the lock for their whole duration;
/// session-scoped retrievals hold it across resolve+read so they never
/// observe a partially-deleted session.
///
/// Entries are never purged; sessions are few and short-lived relative to
/// process lifetime.
#[derive(Default)]
pub struct SessionLockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}
