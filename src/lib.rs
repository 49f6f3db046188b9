//! Diamond Edge - Baseball betting value analysis
//!
//! This library provides:
//! - American / decimal / probability odds conversion
//! - Edge scoring and value ratings against model prices
//! - Kelly criterion bet sizing
//! - Player prop ranking by model confidence
//! - Game-level analysis combining market odds with simulation output
//!
//! # Example
//!
//! ```
//! use diamond_edge::core::{american_to_probability, classify_edge, compute_edge, ValueRating};
//! use diamond_edge::core::kelly::KellyCalculator;
//!
//! // Market has the home side at -150, the model prices it at -210
//! let edge = compute_edge(-150, -210).unwrap();
//! assert_eq!(classify_edge(edge).unwrap(), ValueRating::StrongValue);
//!
//! // Size a quarter-Kelly bet at the market price
//! let calc = KellyCalculator::with_defaults(1_000.0);
//! let p = american_to_probability(-210).unwrap();
//! let sizing = calc.calculate_single(p, -150).unwrap();
//! assert!(sizing.stake > 0.0);
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

// Re-export commonly used types
pub use analysis::{AnalysisError, AnalyzerConfig, ValueAnalyzer};
pub use config::{ConfigError, ServerConfig};
pub use data::{DataError, DataSource, FileProvider, GameDataProvider};
pub use error::EngineError;
pub use models::{
    BettingInsight, GameAnalysis, GameOdds, Outcome, OutcomeAnalysis, SimulationSummary,
};
