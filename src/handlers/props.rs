use actix_web::{web, HttpResponse};
use tracing::info;

use diamond_edge::core::RankedProps;
use diamond_edge::error::AppError;
use diamond_edge::models::{RankPropsRequest, RankPropsResponse};

/// Rank prop candidates by confidence and group them by bet type
pub async fn rank_props(req: web::Json<RankPropsRequest>) -> Result<HttpResponse, AppError> {
    let ranked = RankedProps::rank(req.into_inner().candidates)?;
    info!("Ranked {} prop candidates", ranked.len());

    let response = RankPropsResponse {
        ranked: ranked.as_slice(),
        groups: ranked.by_bet_type(),
    };

    Ok(HttpResponse::Ok().json(response))
}
