use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::ports::VectorIndex;
use crate::presentation::http::dto::{ApiResponse, HealthResponseDto};

pub struct HealthHandler {
    vector_index: Arc<dyn VectorIndex>,
}

impl HealthHandler {
    pub fn new(vector_index: Arc<dyn VectorIndex>) -> Self {
        Self { vector_index }
    }

    pub async fn health(
        State(handler): State<Arc<HealthHandler>>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let vector_index_status = match handler.vector_index.health_check().await {
            Ok(true) => "available",
            Ok(false) | Err(_) => "unavailable",
        };

        let mut services = BTreeMap::new();
        services.insert("vector_index".to_string(), vector_index_status.to_string());

        let dto = HealthResponseDto {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services,
        };

        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }
}
