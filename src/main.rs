mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use infrastructure::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let container = match AppContainer::new().await {
        Ok(container) => container,
        Err(e) => {
            eprintln!("Fatal configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = std::env::var("PORT").ok().and_then(|p| p.parse().ok());

    let server = HttpServer::new(
        Arc::clone(&container.document_handler),
        Arc::clone(&container.session_handler),
        Arc::clone(&container.query_handler),
        Arc::clone(&container.batch_handler),
        Arc::clone(&container.health_handler),
        Arc::clone(&container.cleanup_worker),
        Arc::clone(&container.auth_config),
        port,
    );

    if let Err(e) = server.run().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
