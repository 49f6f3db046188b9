//! Edge Scoring
//!
//! Edge is the model's probability minus the market's implied probability
//! for the same outcome. Positive edge marks a candidate value bet.
//!
//! Ratings use one fixed set of thresholds, applied in priority order:
//!
//! | edge          | rating         |
//! |---------------|----------------|
//! | > 0.05        | `strong_value` |
//! | > 0.02        | `value`        |
//! | < -0.05       | `poor`         |
//! | < -0.02       | `below`        |
//! | otherwise     | `fair`         |
//!
//! Boundaries are exclusive, so `0.02` and `-0.02` are both `fair`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::odds::{american_to_decimal, american_to_probability};
use crate::error::{validate_edge, validate_probability, EngineError};

/// Edge above which an outcome is `strong_value` (and below whose negation it is `poor`)
pub const STRONG_VALUE_EDGE: f64 = 0.05;

/// Edge above which an outcome is `value` (and below whose negation it is `below`)
pub const VALUE_EDGE: f64 = 0.02;

/// Discrete value rating of an edge
///
/// Variants are declared worst to best so that `Ord` ranks them:
/// `Poor < Below < Fair < Value < StrongValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRating {
    Poor,
    Below,
    Fair,
    Value,
    StrongValue,
}

impl ValueRating {
    /// Whether this rating clears the value threshold
    pub fn is_value(self) -> bool {
        matches!(self, ValueRating::Value | ValueRating::StrongValue)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueRating::Poor => "poor",
            ValueRating::Below => "below",
            ValueRating::Fair => "fair",
            ValueRating::Value => "value",
            ValueRating::StrongValue => "strong_value",
        }
    }
}

impl fmt::Display for ValueRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-value selection among a set of outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestValue<K> {
    pub outcome: K,
    pub edge: f64,
    pub rating: ValueRating,
}

/// Compute the edge between a market price and a model price for one outcome
///
/// Both prices must describe the same side of the same outcome. Conversion
/// failures propagate unchanged.
///
/// # Examples
/// ```
/// use diamond_edge::core::edge::compute_edge;
/// // market -150 (60%), model -210 (67.7%)
/// let edge = compute_edge(-150, -210).unwrap();
/// assert!(edge > 0.07 && edge < 0.08);
/// ```
pub fn compute_edge(market_odds: i32, model_odds: i32) -> Result<f64, EngineError> {
    let market_prob = american_to_probability(market_odds)?;
    let model_prob = american_to_probability(model_odds)?;
    Ok(model_prob - market_prob)
}

/// Compute the edge from probabilities the caller already holds
pub fn edge_from_probabilities(model_prob: f64, market_prob: f64) -> Result<f64, EngineError> {
    validate_probability(model_prob)?;
    validate_probability(market_prob)?;
    Ok(model_prob - market_prob)
}

/// Classify an edge into a value rating
///
/// NaN and infinite edges are rejected rather than rated.
pub fn classify_edge(edge: f64) -> Result<ValueRating, EngineError> {
    validate_edge(edge)?;

    let rating = if edge > STRONG_VALUE_EDGE {
        ValueRating::StrongValue
    } else if edge > VALUE_EDGE {
        ValueRating::Value
    } else if edge < -STRONG_VALUE_EDGE {
        ValueRating::Poor
    } else if edge < -VALUE_EDGE {
        ValueRating::Below
    } else {
        ValueRating::Fair
    };
    Ok(rating)
}

/// Pick the outcome with the largest edge, if it clears the value threshold
///
/// Equal maxima resolve to the first one seen. Non-finite edges are skipped.
///
/// # Examples
/// ```
/// use diamond_edge::core::edge::{find_best_value, ValueRating};
/// let edges = [("home", 0.07), ("away", -0.01), ("over", 0.03), ("under", -0.03)];
/// let best = find_best_value(edges).unwrap();
/// assert_eq!(best.outcome, "home");
/// assert_eq!(best.rating, ValueRating::StrongValue);
/// ```
pub fn find_best_value<K, I>(edges: I) -> Option<BestValue<K>>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let mut best: Option<(K, f64)> = None;

    for (outcome, edge) in edges {
        if !edge.is_finite() {
            continue;
        }
        let replace = match &best {
            Some((_, current)) => edge > *current,
            None => true,
        };
        if replace {
            best = Some((outcome, edge));
        }
    }

    let (outcome, edge) = best?;
    if edge <= VALUE_EDGE {
        return None;
    }

    Some(BestValue {
        outcome,
        edge,
        rating: classify_edge(edge).ok()?,
    })
}

/// Expected profit per unit staked at an American price
///
/// `EV = p * (decimal - 1) - (1 - p)`
pub fn expected_value(probability: f64, american_odds: i32) -> Result<f64, EngineError> {
    validate_probability(probability)?;
    let net_odds = american_to_decimal(american_odds)? - 1.0;
    Ok(probability * net_odds - (1.0 - probability))
}
