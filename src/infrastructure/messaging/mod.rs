pub mod cleanup_queue;
pub mod cleanup_worker;

pub use cleanup_queue::{CleanupReceiver, MpscCleanupQueue};
pub use cleanup_worker::CleanupWorker;
