//! Synthetic data provider

use chrono::NaiveDate;

use super::synthetic::SyntheticGenerator;
use crate::data::{DataError, GameDataProvider};
use crate::models::{GameOdds, SimulationSummary};

const GAMES_PER_DAY: usize = 8;

/// Serves generated records for any game id
///
/// Each game is generated from the provider seed mixed with the game id, so
/// market odds and simulation for the same id always agree, regardless of
/// request order.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    default_date: NaiveDate,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            default_date: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap_or_default(),
        }
    }

    fn generate(&self, game_id: &str) -> (GameOdds, SimulationSummary) {
        SyntheticGenerator::new(self.seed ^ fnv1a(game_id)).game(game_id)
    }
}

impl GameDataProvider for SyntheticProvider {
    fn market_odds(&self, game_id: &str) -> Result<GameOdds, DataError> {
        Ok(self.generate(game_id).0)
    }

    fn simulation(&self, game_id: &str) -> Result<SimulationSummary, DataError> {
        Ok(self.generate(game_id).1)
    }

    fn list_games(&self, date: Option<NaiveDate>) -> Result<Vec<String>, DataError> {
        let date = date.unwrap_or(self.default_date);
        Ok((1..=GAMES_PER_DAY)
            .map(|n| format!("mlb-{}-syn{:02}-syn{:02}", date.format("%Y-%m-%d"), 2 * n - 1, 2 * n))
            .collect())
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Stable 64-bit FNV-1a hash
fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
