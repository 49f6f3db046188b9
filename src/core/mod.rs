//! Value analysis engine
//!
//! Pure, synchronous functions with no I/O and no shared state. Safe to call
//! from any number of threads.

pub mod edge;
pub mod kelly;
pub mod odds;
pub mod props;

// Re-export commonly used types
pub use edge::{
    classify_edge, compute_edge, edge_from_probabilities, expected_value, find_best_value,
    BestValue, ValueRating, STRONG_VALUE_EDGE, VALUE_EDGE,
};
pub use kelly::{calculate_optimal_stake, kelly_fraction, kelly_stake, BetSizing, KellyCalculator};
pub use odds::{
    american_to_decimal, american_to_probability, decimal_to_american, probability_to_american,
    probability_to_american_exact, probability_to_decimal,
};
pub use props::{rank_props, PropCandidate, PropGroup, PropSide, RankedProps};
