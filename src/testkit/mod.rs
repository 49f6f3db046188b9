//! Synthetic fixtures
//!
//! Seeded generators for market odds, simulation summaries and prop
//! candidates. Used by the test suites and by the `synthetic` data source
//! when no real feed is available.

pub mod provider;
pub mod synthetic;

pub use provider::SyntheticProvider;
pub use synthetic::{SyntheticGenerator, DEFAULT_MARGIN, PROP_BET_TYPES};
