use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::{info, warn};

use crate::AppState;
use diamond_edge::error::AppError;
use diamond_edge::models::{AnalyzeRequest, GameAnalysis};

/// Analyze a game from odds and simulation records supplied in the body
pub async fn analyze_game(
    state: web::Data<Arc<AppState>>,
    req: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, AppError> {
    let AnalyzeRequest { odds, simulation } = req.into_inner();

    let analysis = state.analyzer.analyze(&odds, &simulation)?;
    log_analysis(&analysis);

    Ok(HttpResponse::Ok().json(analysis))
}

/// Analyze a game using records from the configured data source
pub async fn analyze_stored_game(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let state = state.get_ref().clone();

    // Providers may hit the filesystem
    let analysis = web::block(move || -> Result<GameAnalysis, AppError> {
        let odds = state.provider.market_odds(&game_id).map_err(|e| {
            warn!("Failed to load market odds for {}: {}", game_id, e);
            e
        })?;
        let simulation = state.provider.simulation(&game_id).map_err(|e| {
            warn!("Failed to load simulation for {}: {}", game_id, e);
            e
        })?;
        Ok(state.analyzer.analyze(&odds, &simulation)?)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    log_analysis(&analysis);

    Ok(HttpResponse::Ok().json(analysis))
}

fn log_analysis(analysis: &GameAnalysis) {
    match &analysis.best_value {
        Some(best) => info!(
            "Analyzed {}: best value {} (edge {:.4}, {})",
            analysis.game_id, best.outcome, best.edge, best.rating
        ),
        None => info!("Analyzed {}: no value found", analysis.game_id),
    }
}
