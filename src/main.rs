use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use diamond_edge::error::AppError;
use diamond_edge::{GameDataProvider, ServerConfig, ValueAnalyzer};

mod handlers;

use handlers::{analyze, health, props};

/// Application state shared across handlers
pub struct AppState {
    pub analyzer: ValueAnalyzer,
    pub provider: Box<dyn GameDataProvider>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let provider = config.data_source.build();
    info!("Using {} data source: {:?}", provider.name(), config.data_source);

    let app_state = Arc::new(AppState {
        analyzer: ValueAnalyzer::default(),
        provider,
    });

    let addr = config.addr();
    info!("Starting Diamond Edge API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(err.to_string()).into()
            }))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/analyze", web::post().to(analyze::analyze_game))
            .route(
                "/games/{game_id}/analysis",
                web::get().to(analyze::analyze_stored_game),
            )
            .route("/props/rank", web::post().to(props::rank_props))
    })
    .bind(&addr)?
    .run()
    .await
}
