use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::api::error_code::ErrorCode;
use crate::api::helpers::json_response;
use crate::storage::SeaOrmStorage;

const DB_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub backend: String,
    pub uptime_secs: i64,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        start: web::Data<AppStartTime>,
    ) -> HttpResponse {
        trace!("Received health check request");

        let database = match tokio::time::timeout(DB_PING_TIMEOUT, storage.ping()).await {
            Ok(Ok(())) => "ok",
            Ok(Err(e)) => {
                error!("Health check: {}", e);
                "unreachable"
            }
            Err(_) => {
                error!("Health check: database ping timed out");
                "timeout"
            }
        };

        let healthy = database == "ok";
        let body = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            database: database.to_string(),
            backend: storage.backend_name().to_string(),
            uptime_secs: (Utc::now() - start.start_datetime).num_seconds(),
        };

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(body))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(body),
            )
        }
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health").route("", web::get().to(HealthService::health_check))
}
