use axum::{
    Router,
    routing::{delete, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::SessionHandler;

pub fn session_routes(session_handler: Arc<SessionHandler>) -> Router {
    Router::new()
        .route(
            "/documents/session/create",
            post(SessionHandler::create_session),
        )
        .route(
            "/documents/session/{session_id}",
            delete(SessionHandler::delete_session),
        )
        .with_state(session_handler)
}
