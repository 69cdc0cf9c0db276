use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::messaging::CleanupWorker;
use crate::presentation::http::{
    auth::{AuthConfig, require_auth},
    handlers::{BatchHandler, DocumentHandler, HealthHandler, QueryHandler, SessionHandler},
    routes::{batch_routes, document_routes, health_routes, query_routes, session_routes},
};

const BODY_LIMIT_BYTES: usize = 60 * 1024 * 1024;

pub struct HttpServer {
    document_handler: Arc<DocumentHandler>,
    session_handler: Arc<SessionHandler>,
    query_handler: Arc<QueryHandler>,
    batch_handler: Arc<BatchHandler>,
    health_handler: Arc<HealthHandler>,
    cleanup_worker: Arc<CleanupWorker>,
    auth_config: Arc<AuthConfig>,
    port: u16,
}

impl HttpServer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document_handler: Arc<DocumentHandler>,
        session_handler: Arc<SessionHandler>,
        query_handler: Arc<QueryHandler>,
        batch_handler: Arc<BatchHandler>,
        health_handler: Arc<HealthHandler>,
        cleanup_worker: Arc<CleanupWorker>,
        auth_config: Arc<AuthConfig>,
        port: Option<u16>,
    ) -> Self {
        Self {
            document_handler,
            session_handler,
            query_handler,
            batch_handler,
            health_handler,
            cleanup_worker,
            auth_config,
            port: port.unwrap_or(3000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        // The cleanup worker drains failed ephemeral deletions for the
        // lifetime of the process.
        let cleanup_worker = self.cleanup_worker.clone();
        tokio::spawn(async move {
            cleanup_worker.start().await;
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let protected = Router::new()
            .merge(document_routes(self.document_handler))
            .merge(session_routes(self.session_handler))
            .merge(query_routes(self.query_handler))
            .merge(batch_routes(self.batch_handler))
            .layer(axum::middleware::from_fn_with_state(
                self.auth_config.clone(),
                require_auth,
            ));

        let app = Router::new()
            .merge(health_routes(self.health_handler))
            .merge(protected)
            .layer(
                ServiceBuilder::new()
                    .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                    .layer(
                        TraceLayer::new_for_http()
                            .on_request(
                                |request: &axum::http::Request<
                                    tower_http::body::Limited<axum::body::Body>,
                                >,
                                 _span: &tracing::Span| {
                                    tracing::info!(
                                        "Received request: {} {}",
                                        request.method(),
                                        request.uri()
                                    );
                                },
                            )
                            .on_response(
                                |response: &axum::http::Response<axum::body::Body>,
                                 latency: std::time::Duration,
                                 _span: &tracing::Span| {
                                    tracing::info!(
                                        "Response: {} (took {} ms)",
                                        response.status(),
                                        latency.as_millis()
                                    );
                                },
                            ),
                    )
                    .layer(cors),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("Server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
