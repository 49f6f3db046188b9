use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{BestValue, PropCandidate, PropGroup, ValueRating};

/// Market betting odds for one game, as supplied by the odds feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOdds {
    pub game_id: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,

    // Moneyline
    pub home_moneyline: i32,
    pub away_moneyline: i32,

    // Total
    pub total_runs: f64,
    pub over_odds: i32,
    pub under_odds: i32,

    // Run line
    #[serde(default = "default_spread")]
    pub spread: f64,
    #[serde(default)]
    pub home_spread_odds: Option<i32>,
    #[serde(default)]
    pub away_spread_odds: Option<i32>,

    #[serde(default = "default_bookmaker")]
    pub bookmaker: String,
    pub last_updated: DateTime<Utc>,
}

fn default_spread() -> f64 {
    1.5
}

fn default_bookmaker() -> String {
    "Consensus".to_string()
}

/// Model prices for the four game-level outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingInsight {
    pub home_moneyline: i32,
    pub away_moneyline: i32,
    pub over_odds: i32,
    pub under_odds: i32,
}

/// Simulation output for one game, as supplied by the simulation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub game_id: String,
    pub simulation_count: u32,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub average_home_score: f64,
    pub average_away_score: f64,
    pub average_total_runs: f64,
    pub betting_insights: BettingInsight,
    #[serde(default)]
    pub prop_bet_insights: Option<Vec<PropCandidate>>,
    #[serde(default)]
    pub impacting_factors: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Game-level outcome a price refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Away,
    Over,
    Under,
}

impl Outcome {
    /// Fixed evaluation order; best-value ties resolve to the earlier entry
    pub const ALL: [Outcome; 4] = [Outcome::Home, Outcome::Away, Outcome::Over, Outcome::Under];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Away => "away",
            Outcome::Over => "over",
            Outcome::Under => "under",
        }
    }

    /// Market price for this outcome
    pub fn market_odds(self, odds: &GameOdds) -> i32 {
        match self {
            Outcome::Home => odds.home_moneyline,
            Outcome::Away => odds.away_moneyline,
            Outcome::Over => odds.over_odds,
            Outcome::Under => odds.under_odds,
        }
    }

    /// Model price for this outcome
    pub fn model_odds(self, insight: &BettingInsight) -> i32 {
        match self {
            Outcome::Home => insight.home_moneyline,
            Outcome::Away => insight.away_moneyline,
            Outcome::Over => insight.over_odds,
            Outcome::Under => insight.under_odds,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge analysis for one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeAnalysis {
    pub outcome: Outcome,
    pub market_odds: i32,
    pub model_odds: i32,
    pub market_probability: f64,
    pub model_probability: f64,
    pub edge: f64,
    pub rating: ValueRating,
    /// Per unit staked at the market price, using the model probability
    pub expected_value: f64,
    /// Full Kelly fraction at the market price
    pub kelly_stake: f64,
}

/// Full value analysis for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub game_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
    pub total_runs: f64,
    pub outcomes: Vec<OutcomeAnalysis>,
    pub best_value: Option<BestValue<Outcome>>,
    pub props: Vec<PropCandidate>,
}

impl GameAnalysis {
    pub fn outcome(&self, outcome: Outcome) -> Option<&OutcomeAnalysis> {
        self.outcomes.iter().find(|o| o.outcome == outcome)
    }
}

/// Analysis request carrying both collaborators' records
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub odds: GameOdds,
    pub simulation: SimulationSummary,
}

/// Prop ranking request
#[derive(Debug, Serialize, Deserialize)]
pub struct RankPropsRequest {
    pub candidates: Vec<PropCandidate>,
}

/// Prop ranking response
#[derive(Debug, Serialize)]
pub struct RankPropsResponse<'a> {
    pub ranked: &'a [PropCandidate],
    pub groups: Vec<PropGroup<'a>>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_source: String,
    /// Games the data source can serve; absent when listing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_available: Option<usize>,
}

impl HealthResponse {
    /// "ok" when the data source answered, "degraded" otherwise
    pub fn from_listing(data_source: &str, listing: Result<usize, String>) -> Self {
        let (status, games_available) = match listing {
            Ok(count) => ("ok", Some(count)),
            Err(_) => ("degraded", None),
        };
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_source: data_source.to_string(),
            games_available,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
