//! Game Value Analysis
//!
//! Pairs a market odds record with a simulation record for the same game and
//! runs every outcome through the engine.

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{
    american_to_probability, classify_edge, expected_value, find_best_value, kelly_stake,
    RankedProps,
};
use crate::error::EngineError;
use crate::models::{GameAnalysis, GameOdds, Outcome, OutcomeAnalysis, SimulationSummary};

/// Analysis errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("market odds are for game {market} but simulation is for game {model}")]
    GameMismatch { market: String, model: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Rank the model's prop insights alongside the game outcomes
    pub include_props: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_props: true,
        }
    }
}

/// Produces value ratings, best-value selection and stakes for a game
#[derive(Debug, Clone, Default)]
pub struct ValueAnalyzer {
    config: AnalyzerConfig,
}

impl ValueAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a single outcome
    ///
    /// Expected value and Kelly stake are taken at the market price, since
    /// that is the price a bet would actually get.
    pub fn analyze_outcome(
        &self,
        outcome: Outcome,
        market_odds: i32,
        model_odds: i32,
    ) -> Result<OutcomeAnalysis, EngineError> {
        let market_probability = american_to_probability(market_odds)?;
        let model_probability = american_to_probability(model_odds)?;
        let edge = model_probability - market_probability;

        Ok(OutcomeAnalysis {
            outcome,
            market_odds,
            model_odds,
            market_probability,
            model_probability,
            edge,
            rating: classify_edge(edge)?,
            expected_value: expected_value(model_probability, market_odds)?,
            kelly_stake: kelly_stake(model_probability, market_odds)?,
        })
    }

    /// Analyze a game
    ///
    /// Outcomes with unusable prices are logged and left out. If every
    /// outcome fails, the first failure is returned.
    pub fn analyze(
        &self,
        odds: &GameOdds,
        simulation: &SimulationSummary,
    ) -> Result<GameAnalysis, AnalysisError> {
        if odds.game_id != simulation.game_id {
            return Err(AnalysisError::GameMismatch {
                market: odds.game_id.clone(),
                model: simulation.game_id.clone(),
            });
        }

        let mut outcomes = Vec::with_capacity(Outcome::ALL.len());
        let mut first_error = None;

        for outcome in Outcome::ALL {
            let market = outcome.market_odds(odds);
            let model = outcome.model_odds(&simulation.betting_insights);

            match self.analyze_outcome(outcome, market, model) {
                Ok(analysis) => outcomes.push(analysis),
                Err(e) => {
                    warn!(
                        "Skipping {} for game {}: market {}, model {}: {}",
                        outcome, odds.game_id, market, model, e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if outcomes.is_empty() {
            if let Some(e) = first_error {
                return Err(e.into());
            }
        }

        let best_value = find_best_value(outcomes.iter().map(|o| (o.outcome, o.edge)));
        if let Some(ref best) = best_value {
            debug!(
                "Best value for game {}: {} (edge {:.4}, {})",
                odds.game_id, best.outcome, best.edge, best.rating
            );
        }

        let props = match (&simulation.prop_bet_insights, self.config.include_props) {
            (Some(insights), true) => RankedProps::rank(insights.clone())?.into_inner(),
            _ => Vec::new(),
        };

        Ok(GameAnalysis {
            game_id: odds.game_id.clone(),
            home_team: odds.home_team.clone(),
            away_team: odds.away_team.clone(),
            total_runs: odds.total_runs,
            outcomes,
            best_value,
            props,
        })
    }
}
