use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::services::TokenStore;
use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::HealthResponse;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        store: web::Data<Arc<dyn TokenStore>>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let database = match tokio::time::timeout(CHECK_TIMEOUT, storage.ping()).await {
            Ok(Ok(())) => "healthy".to_string(),
            Ok(Err(e)) => {
                error!("Database health check failed: {}", e);
                "unhealthy".to_string()
            }
            Err(_) => {
                error!("Database health check timeout");
                "timeout".to_string()
            }
        };

        let token_store = match tokio::time::timeout(CHECK_TIMEOUT, store.get("health")).await {
            Ok(Ok(_)) => "healthy".to_string(),
            Ok(Err(e)) => {
                error!("Token store health check failed: {}", e);
                "unhealthy".to_string()
            }
            Err(_) => "timeout".to_string(),
        };

        let is_healthy = database == "healthy" && token_store == "healthy";
        let data = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            database,
            token_store,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        if is_healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(data),
            )
        }
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

/// `/health` 与 `/health/live`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}
