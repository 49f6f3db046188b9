//! Odds Conversion
//!
//! Maps between the three ways a price is expressed:
//!
//! - American odds: `-160` means stake 160 to win 100, `+140` means stake
//!   100 to win 140
//! - Decimal odds: total payout per unit staked, stake included
//! - Implied probability: the chance consistent with the price at zero margin
//!
//! All functions return signed numbers; sign prefixes and percent formatting
//! belong to whoever displays them.

use crate::error::{
    validate_american_odds, validate_decimal_odds, validate_probability, EngineError,
};

/// Books quote American prices in steps of this size
pub const AMERICAN_ODDS_STEP: f64 = 5.0;

/// Convert American odds to implied probability
///
/// # Examples
/// ```
/// use diamond_edge::core::odds::american_to_probability;
/// let p = american_to_probability(-150).unwrap();
/// assert!((p - 0.6).abs() < 1e-12);
/// ```
pub fn american_to_probability(odds: i32) -> Result<f64, EngineError> {
    validate_american_odds(odds)?;

    let magnitude = f64::from(odds.unsigned_abs());
    let prob = if odds > 0 {
        100.0 / (magnitude + 100.0)
    } else {
        magnitude / (magnitude + 100.0)
    };

    Ok(prob)
}

/// Convert American odds to decimal odds
///
/// # Examples
/// ```
/// use diamond_edge::core::odds::american_to_decimal;
/// assert!((american_to_decimal(140).unwrap() - 2.4).abs() < 1e-12);
/// assert!((american_to_decimal(-200).unwrap() - 1.5).abs() < 1e-12);
/// ```
pub fn american_to_decimal(odds: i32) -> Result<f64, EngineError> {
    validate_american_odds(odds)?;

    let magnitude = f64::from(odds.unsigned_abs());
    let decimal = if odds > 0 {
        1.0 + magnitude / 100.0
    } else {
        1.0 + 100.0 / magnitude
    };

    Ok(decimal)
}

/// Convert decimal odds to American odds, rounded to the nearest integer
pub fn decimal_to_american(decimal: f64) -> Result<i32, EngineError> {
    validate_decimal_odds(decimal)?;

    let american = if decimal >= 2.0 {
        (decimal - 1.0) * 100.0
    } else {
        -100.0 / (decimal - 1.0)
    };

    let american = to_american(american.round_ties_even()).ok_or(EngineError::InvalidOdds {
        odds: decimal,
        reason: "decimal odds too close to 1",
    })?;
    validate_american_odds(american)?;
    Ok(american)
}

/// Convert a probability to decimal odds
pub fn probability_to_decimal(prob: f64) -> Result<f64, EngineError> {
    validate_probability(prob)?;
    Ok(1.0 / prob)
}

/// Convert a probability to unrounded American odds
///
/// Favorites (`prob > 0.5`) come out negative, everything else positive.
/// Use this when the price feeds further math, such as stake sizing.
pub fn probability_to_american_exact(prob: f64) -> Result<f64, EngineError> {
    validate_probability(prob)?;

    let odds = if prob > 0.5 {
        -100.0 * prob / (1.0 - prob)
    } else {
        100.0 * (1.0 - prob) / prob
    };

    Ok(odds)
}

/// Convert a probability to American odds as a book would quote them
///
/// The exact price is rounded to the nearest multiple of 5 (ties to even),
/// and even money is always reported as `+100`. This is lossy: going
/// `american -> probability -> american` lands within one rounding step of
/// the start, and a second trip returns the same price.
///
/// # Examples
/// ```
/// use diamond_edge::core::odds::probability_to_american;
/// assert_eq!(probability_to_american(0.6).unwrap(), -150);
/// assert_eq!(probability_to_american(0.4).unwrap(), 150);
/// assert_eq!(probability_to_american(0.5).unwrap(), 100);
/// ```
pub fn probability_to_american(prob: f64) -> Result<i32, EngineError> {
    let exact = probability_to_american_exact(prob)?;
    let rounded = (exact / AMERICAN_ODDS_STEP).round_ties_even() * AMERICAN_ODDS_STEP;

    // Only a hair away from 0 or 1 does the price overflow
    let odds = to_american(rounded).ok_or(EngineError::InvalidProbability(prob))?;
    if odds == -100 {
        return Ok(100);
    }
    Ok(odds)
}

/// Narrow a whole-number price to `i32`
fn to_american(value: f64) -> Option<i32> {
    if !value.is_finite() || value.abs() > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}
