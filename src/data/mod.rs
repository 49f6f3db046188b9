//! Game data providers
//!
//! The analyzer needs two records per game: market odds and a simulation
//! summary. Where they come from is chosen once, at construction, through
//! [`DataSource`].

pub mod files;

pub use files::{parse_game_date, FileProvider};

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{GameOdds, SimulationSummary};

/// Data loading errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no {kind} found for game {game_id}")]
    NotFound { game_id: String, kind: &'static str },

    #[error("invalid game id: {0:?}")]
    InvalidGameId(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Supplies market odds and simulation results for games
pub trait GameDataProvider: Send + Sync {
    /// Market odds for a game
    fn market_odds(&self, game_id: &str) -> Result<GameOdds, DataError>;

    /// Simulation summary for a game
    fn simulation(&self, game_id: &str) -> Result<SimulationSummary, DataError>;

    /// Games with market odds available, optionally restricted to one date
    fn list_games(&self, date: Option<NaiveDate>) -> Result<Vec<String>, DataError>;

    /// Short name for logs and health checks
    fn name(&self) -> &'static str;
}

/// Where game data comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// JSON records on disk
    Files {
        odds_dir: PathBuf,
        simulations_dir: PathBuf,
    },
    /// Seeded synthetic records, for development
    #[cfg(feature = "testkit")]
    Synthetic { seed: u64 },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Files {
            odds_dir: PathBuf::from("data/odds"),
            simulations_dir: PathBuf::from("data/simulations"),
        }
    }
}

impl DataSource {
    /// Build the provider this source describes
    pub fn build(&self) -> Box<dyn GameDataProvider> {
        match self {
            DataSource::Files {
                odds_dir,
                simulations_dir,
            } => Box::new(FileProvider::new(odds_dir, simulations_dir)),
            #[cfg(feature = "testkit")]
            DataSource::Synthetic { seed } => {
                Box::new(crate::testkit::SyntheticProvider::new(*seed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_is_files() {
        assert!(matches!(DataSource::default(), DataSource::Files { .. }));
        assert_eq!(DataSource::default().build().name(), "files");
    }

    #[cfg(feature = "testkit")]
    #[test]
    fn test_synthetic_source() {
        let provider = DataSource::Synthetic { seed: 3 }.build();
        assert_eq!(provider.name(), "synthetic");
    }

    #[test]
    fn test_not_found_display() {
        let err = DataError::NotFound {
            game_id: "g1".to_string(),
            kind: "market odds",
        };
        assert_eq!(err.to_string(), "no market odds found for game g1");
    }
}
