use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::ErrorResponse;
use crate::routes::AppState;
use crate::services::PostgresError;

/// Configure content matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/matching")
            .route(
                "/contractors/{contractor_id}/matches/all",
                web::get().to(get_matched_content),
            )
            .route("/books", web::get().to(get_books))
            .route("/podcasts", web::get().to(get_podcasts))
            .route("/events", web::get().to(get_events)),
    );
}

/// Aggregated matches for a contractor
///
/// GET /api/matching/contractors/{contractorId}/matches/all
///
/// Response:
/// ```json
/// {
///   "book": { "...": "...", "type": "book", "matchScore": 4 },
///   "podcast": null,
///   "event": null,
///   "partners": [{ "...": "...", "type": "partner", "matchScore": 7 }],
///   "focusAreas": ["marketing_sales"],
///   "primaryFocus": "marketing_sales"
/// }
/// ```
async fn get_matched_content(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let contractor_id = path.into_inner();

    if let Some(cached) = state.cache.get(contractor_id).await {
        tracing::debug!("Serving cached matches for contractor {}", contractor_id);
        return HttpResponse::Ok().json(cached.as_ref());
    }

    let contractor = match state.postgres.get_contractor(contractor_id).await {
        Ok(contractor) => contractor,
        Err(PostgresError::NotFound(_)) => {
            tracing::info!("Contractor {} not found", contractor_id);
            return HttpResponse::NotFound().json(ErrorResponse::new("Contractor not found"));
        }
        Err(e) => return state.internal_error("Failed to fetch matched content", &e),
    };

    let outcome = state
        .matcher
        .aggregate(state.postgres.as_ref(), &contractor)
        .await;

    tracing::info!(
        "Returning matches for contractor {} (partners: {}, degraded: {:?})",
        contractor_id,
        outcome.matches.partners.len(),
        outcome.failed_sources
    );

    // Partial results are served but not cached
    if outcome.is_complete() {
        let matches = Arc::new(outcome.matches);
        state.cache.insert(contractor_id, matches.clone()).await;
        HttpResponse::Ok().json(matches.as_ref())
    } else {
        HttpResponse::Ok().json(&outcome.matches)
    }
}

/// GET /api/matching/books
async fn get_books(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_books().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => state.internal_error("Failed to fetch books", &e),
    }
}

/// GET /api/matching/podcasts
async fn get_podcasts(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_podcasts().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => state.internal_error("Failed to fetch podcasts", &e),
    }
}

/// GET /api/matching/events
async fn get_events(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_events().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => state.internal_error("Failed to fetch events", &e),
    }
}
