// Route exports
pub mod ghl_sync;
pub mod matching;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, Responder, ResponseError};
use std::fmt::Display;
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{GhlClient, MatchCache, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<MatchCache>,
    pub ghl: Option<Arc<GhlClient>>,
    pub matcher: Matcher,
    pub expose_error_details: bool,
}

impl AppState {
    /// 500 response for a failed operation; the cause is logged and only
    /// echoed to the client when configured to
    pub fn internal_error(&self, error: &str, cause: &impl Display) -> HttpResponse {
        tracing::error!("{}: {}", error, cause);
        HttpResponse::InternalServerError().json(error_body(self.expose_error_details, error, cause))
    }
}

fn error_body(expose_details: bool, error: &str, cause: &impl Display) -> ErrorResponse {
    if expose_details {
        ErrorResponse::with_details(error, cause.to_string())
    } else {
        ErrorResponse::new(error)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .configure(matching::configure)
            .configure(ghl_sync::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        match_cache: state.cache.stats(),
        timestamp: chrono::Utc::now(),
    })
}

/// JSON error for rejected request payloads
#[derive(Debug)]
pub struct BadRequest {
    pub error: &'static str,
    pub details: String,
}

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.details)
    }
}

impl ResponseError for BadRequest {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorResponse::with_details(self.error, self.details.clone()))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    BadRequest {
        error: "Invalid JSON",
        details: err.to_string(),
    }
    .into()
}

/// Handle path parameter errors, e.g. a non-numeric contractor id
pub fn handle_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    BadRequest {
        error: "Invalid path parameter",
        details: err.to_string(),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    BadRequest {
        error: "Invalid query",
        details: err.to_string(),
    }
    .into()
}
