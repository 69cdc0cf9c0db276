pub mod batch_routes;
pub mod document_routes;
pub mod health_routes;
pub mod query_routes;
pub mod session_routes;

pub use batch_routes::batch_routes;
pub use document_routes::document_routes;
pub use health_routes::health_routes;
pub use query_routes::query_routes;
pub use session_routes::session_routes;
