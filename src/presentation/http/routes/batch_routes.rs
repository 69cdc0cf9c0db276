use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::BatchHandler;

pub fn batch_routes(batch_handler: Arc<BatchHandler>) -> Router {
    Router::new()
        .route("/hackrx/run", post(BatchHandler::run_batch))
        .with_state(batch_handler)
}
