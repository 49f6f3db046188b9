use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use diamond_edge::models::HealthResponse;

/// Health check endpoint
///
/// Lists today's slate from the data source; a failing listing reports
/// "degraded" instead of failing the check.
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let state = state.get_ref().clone();
    let source = state.provider.name();

    let listing = web::block(move || {
        let today = chrono::Utc::now().date_naive();
        state
            .provider
            .list_games(Some(today))
            .map(|games| games.len())
            .map_err(|e| e.to_string())
    })
    .await
    .unwrap_or_else(|e| Err(e.to_string()));

    if let Err(ref e) = listing {
        warn!("Health check could not list games from {}: {}", source, e);
    }

    HttpResponse::Ok().json(HealthResponse::from_listing(source, listing))
}
