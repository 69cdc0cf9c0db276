pub mod batch_handler;
pub mod document_handler;
pub mod health_handler;
pub mod query_handler;
pub mod session_handler;

pub use batch_handler::BatchHandler;
pub use document_handler::DocumentHandler;
pub use health_handler::HealthHandler;
pub use query_handler::QueryHandler;
pub use session_handler::SessionHandler;
