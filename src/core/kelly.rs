//! Kelly Criterion Bet Sizing
//!
//! Optimal bet sizing based on edge and odds using Kelly criterion.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = decimal odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!
//! [`kelly_stake`] is full, uncapped Kelly floored at zero. Fractional Kelly,
//! per-bet caps and exposure limits live in [`KellyCalculator`], which sits on
//! top of it.

use serde::{Deserialize, Serialize};

use super::edge::expected_value;
use super::odds::{american_to_decimal, american_to_probability};
use crate::error::{validate_decimal_odds, validate_probability, EngineError};

/// Bet sizing recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSizing {
    pub probability: f64,
    pub american_odds: i32,
    pub decimal_odds: f64,
    pub implied_probability: f64,
    pub edge: f64,                 // probability - implied_probability
    pub expected_value: f64,       // per unit staked
    pub kelly_fraction: f64,       // Full Kelly, floored at 0
    pub recommended_fraction: f64, // After applying Kelly multiplier
    pub stake: f64,                // Recommended stake amount
}

/// Calculate the raw Kelly fraction for decimal odds
///
/// Negative when the bet has negative expected value.
///
/// # Examples
/// ```
/// use diamond_edge::core::kelly::kelly_fraction;
/// let f = kelly_fraction(0.25, 5.0).unwrap(); // EV = 1.25
/// assert!((f - 0.0625).abs() < 0.0001);
/// ```
pub fn kelly_fraction(probability: f64, decimal_odds: f64) -> Result<f64, EngineError> {
    validate_probability(probability)?;
    validate_decimal_odds(decimal_odds)?;

    let b = decimal_odds - 1.0;
    let q = 1.0 - probability;
    Ok((b * probability - q) / b)
}

/// Recommended fraction of bankroll for a bet at an American price
///
/// Full Kelly, never negative: a bet with negative expected value gets 0.
///
/// # Examples
/// ```
/// use diamond_edge::core::kelly::kelly_stake;
/// assert_eq!(kelly_stake(0.5, 100).unwrap(), 0.0);
/// assert!((kelly_stake(0.6, 100).unwrap() - 0.2).abs() < 1e-12);
/// ```
pub fn kelly_stake(probability: f64, american_odds: i32) -> Result<f64, EngineError> {
    let decimal = american_to_decimal(american_odds)?;
    Ok(kelly_fraction(probability, decimal)?.max(0.0))
}

/// Calculate optimal stake amount
///
/// # Arguments
/// * `probability` - Estimated probability of winning
/// * `american_odds` - Price offered
/// * `bankroll` - Current bankroll amount
/// * `kelly_multiplier` - Kelly fraction multiplier (0.25 = quarter Kelly)
/// * `min_stake` - Minimum stake amount
/// * `max_stake_pct` - Maximum stake as a fraction of bankroll
///
/// # Returns
/// Recommended stake amount (rounded down to cents)
pub fn calculate_optimal_stake(
    probability: f64,
    american_odds: i32,
    bankroll: f64,
    kelly_multiplier: f64,
    min_stake: f64,
    max_stake_pct: f64,
) -> Result<f64, EngineError> {
    let kelly = kelly_stake(probability, american_odds)?;

    if kelly <= 0.0 || bankroll <= 0.0 {
        return Ok(0.0);
    }

    // Apply Kelly multiplier (fractional Kelly)
    let raw_stake = bankroll * kelly * kelly_multiplier;

    // Apply maximum stake limit
    let max_stake = bankroll * max_stake_pct;
    let stake = floor_cents(raw_stake.min(max_stake));

    // Apply minimum stake; the per-bet cap always wins over it
    if stake < min_stake {
        if raw_stake < min_stake / 2.0 || min_stake > max_stake {
            return Ok(0.0);
        }
        return Ok(min_stake);
    }

    Ok(stake)
}

fn floor_cents(amount: f64) -> f64 {
    (amount * 100.0).floor() / 100.0
}

/// Kelly criterion calculator for bet sizing
///
/// Supports:
/// - Full Kelly (aggressive)
/// - Fractional Kelly (conservative, default 1/4)
/// - Multiple simultaneous bets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyCalculator {
    pub bankroll: f64,
    pub kelly_multiplier: f64,
    pub min_stake: f64,
    pub max_stake_pct: f64,
    pub max_total_exposure: f64,
}

impl KellyCalculator {
    /// Create a new Kelly calculator
    ///
    /// # Arguments
    /// * `bankroll` - Initial bankroll
    /// * `kelly_multiplier` - Fraction of Kelly to use (0.25 = quarter Kelly)
    /// * `min_stake` - Minimum bet size
    /// * `max_stake_pct` - Maximum single bet as fraction of bankroll
    /// * `max_total_exposure` - Maximum total exposure across all bets
    pub fn new(
        bankroll: f64,
        kelly_multiplier: f64,
        min_stake: f64,
        max_stake_pct: f64,
        max_total_exposure: f64,
    ) -> Self {
        Self {
            bankroll,
            kelly_multiplier,
            min_stake,
            max_stake_pct,
            max_total_exposure,
        }
    }

    /// Create with default settings (quarter Kelly, 10% per bet, 30% total)
    pub fn with_defaults(bankroll: f64) -> Self {
        Self {
            bankroll,
            kelly_multiplier: 0.25,
            min_stake: 1.0,
            max_stake_pct: 0.10,
            max_total_exposure: 0.30,
        }
    }

    /// Calculate bet sizing for a single bet
    pub fn calculate_single(
        &self,
        probability: f64,
        american_odds: i32,
    ) -> Result<BetSizing, EngineError> {
        let decimal_odds = american_to_decimal(american_odds)?;
        let implied_probability = american_to_probability(american_odds)?;
        let kelly = kelly_stake(probability, american_odds)?;
        let expected_value = expected_value(probability, american_odds)?;

        let stake = calculate_optimal_stake(
            probability,
            american_odds,
            self.bankroll,
            self.kelly_multiplier,
            self.min_stake,
            self.max_stake_pct,
        )?;

        Ok(BetSizing {
            probability,
            american_odds,
            decimal_odds,
            implied_probability,
            edge: probability - implied_probability,
            expected_value,
            kelly_fraction: kelly,
            recommended_fraction: kelly * self.kelly_multiplier,
            stake,
        })
    }

    /// Calculate bet sizing for multiple simultaneous bets
    ///
    /// Stakes are scaled down proportionally when their sum would exceed the
    /// total exposure limit.
    pub fn calculate_multiple(&self, bets: &[(f64, i32)]) -> Result<Vec<BetSizing>, EngineError> {
        if bets.is_empty() {
            return Ok(Vec::new());
        }

        let mut sizings = bets
            .iter()
            .map(|&(p, odds)| self.calculate_single(p, odds))
            .collect::<Result<Vec<_>, _>>()?;

        let total_stake: f64 = sizings.iter().map(|s| s.stake).sum();
        let max_exposure = self.bankroll * self.max_total_exposure;

        if total_stake > max_exposure {
            let scale_factor = max_exposure / total_stake;

            for sizing in &mut sizings {
                let new_stake = floor_cents(sizing.stake * scale_factor);
                sizing.stake = if new_stake < self.min_stake {
                    0.0
                } else {
                    new_stake
                };
                sizing.recommended_fraction *= scale_factor;
            }
        }

        Ok(sizings)
    }

    /// Update bankroll after bet result
    pub fn update_bankroll(&mut self, profit: f64) {
        self.bankroll += profit;
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::with_defaults(1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelly_fraction_positive_ev() {
        // EV = 0.25 * 5.0 = 1.25 (positive edge)
        let kelly = kelly_fraction(0.25, 5.0).unwrap();
        assert!((kelly - 0.0625).abs() < 0.0001);
    }

    #[test]
    fn test_kelly_fraction_negative_ev() {
        // EV = 0.10 * 5.0 = 0.50 (negative edge)
        let kelly = kelly_fraction(0.10, 5.0).unwrap();
        assert!(kelly < 0.0);
    }

    #[test]
    fn test_kelly_fraction_invalid_odds() {
        assert!(matches!(
            kelly_fraction(0.25, 1.0),
            Err(EngineError::InvalidOdds { .. })
        ));
    }

    #[test]
    fn test_kelly_stake_fair_coin_even_money() {
        assert_eq!(kelly_stake(0.5, 100).unwrap(), 0.0);
    }

    #[test]
    fn test_kelly_stake_breakeven_at_fair_price() {
        // -150 implies 60%, so a 60% belief has no edge
        let stake = kelly_stake(0.6, -150).unwrap();
        assert!(stake.abs() < 1e-9);
    }

    #[test]
    fn test_kelly_stake_positive_edge() {
        // b = 1.4, (1.4 * 0.5 - 0.5) / 1.4
        let stake = kelly_stake(0.5, 140).unwrap();
        assert!((stake - 0.142857).abs() < 1e-6);
    }

    #[test]
    fn test_kelly_stake_never_negative() {
        for odds in [-500, -200, -110, 100, 150, 400] {
            for i in 1..20 {
                let p = f64::from(i) / 20.0;
                let stake = kelly_stake(p, odds).unwrap();
                assert!(stake >= 0.0, "p={} odds={} gave {}", p, odds, stake);
                assert!(stake <= 1.0);
            }
        }
    }

    #[test]
    fn test_kelly_stake_invalid_input() {
        assert!(matches!(
            kelly_stake(0.0, 100),
            Err(EngineError::InvalidProbability(_))
        ));
        assert!(matches!(
            kelly_stake(1.0, 100),
            Err(EngineError::InvalidProbability(_))
        ));
        assert!(matches!(
            kelly_stake(0.5, 0),
            Err(EngineError::InvalidOdds { .. })
        ));
    }

    #[test]
    fn test_optimal_stake_calculation() {
        // Full Kelly = 0.1, quarter Kelly = 0.025 of 1000
        let stake = calculate_optimal_stake(0.55, 100, 1_000.0, 0.25, 1.0, 0.10).unwrap();
        assert!((stake - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_stake_capped() {
        // Full Kelly = 0.5, half Kelly = 0.25, capped at 10%
        let stake = calculate_optimal_stake(0.75, 100, 1_000.0, 0.5, 1.0, 0.10).unwrap();
        assert!((stake - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_stake_below_minimum() {
        // raw stake 2.5 against a minimum of 10: under half, so no bet
        let stake = calculate_optimal_stake(0.55, 100, 100.0, 0.25, 10.0, 0.10).unwrap();
        assert_eq!(stake, 0.0);

        // raw stake 2.5 against a minimum of 4: rounded up to the minimum
        let stake = calculate_optimal_stake(0.55, 100, 100.0, 0.25, 4.0, 0.10).unwrap();
        assert_eq!(stake, 4.0);
    }

    #[test]
    fn test_optimal_stake_minimum_never_exceeds_cap() {
        // Bankroll 3: cap is 0.30, raw stake 0.60 would round up to the minimum of 1
        let stake = calculate_optimal_stake(0.9, 100, 3.0, 0.25, 1.0, 0.10).unwrap();
        assert_eq!(stake, 0.0);

        let calc = KellyCalculator::with_defaults(3.0);
        let sizing = calc.calculate_single(0.9, 100).unwrap();
        assert!(sizing.stake <= calc.bankroll * calc.max_stake_pct);
        assert_eq!(sizing.stake, 0.0);
    }

    #[test]
    fn test_calculate_single_expected_value() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        let sizing = calc.calculate_single(0.55, -110).unwrap();
        let ev = expected_value(0.55, -110).unwrap();
        assert!((sizing.expected_value - ev).abs() < 1e-12);
    }

    #[test]
    fn test_calculator_single() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        let sizing = calc.calculate_single(0.55, 100).unwrap();

        assert_eq!(sizing.american_odds, 100);
        assert!((sizing.decimal_odds - 2.0).abs() < 1e-12);
        assert!((sizing.implied_probability - 0.5).abs() < 1e-12);
        assert!((sizing.edge - 0.05).abs() < 1e-9);
        assert!((sizing.expected_value - 0.1).abs() < 1e-9);
        assert!((sizing.kelly_fraction - 0.1).abs() < 1e-9);
        assert!((sizing.recommended_fraction - 0.025).abs() < 1e-9);
        assert!(sizing.stake > 0.0);
    }

    #[test]
    fn test_calculate_single_negative_ev() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        let sizing = calc.calculate_single(0.40, -150).unwrap();

        assert!(sizing.expected_value < 0.0);
        assert_eq!(sizing.kelly_fraction, 0.0);
        assert_eq!(sizing.stake, 0.0); // Should not bet
    }

    #[test]
    fn test_calculator_multiple_exposure_limit() {
        let calc = KellyCalculator::with_defaults(1_000.0);

        // Four strong bets that would exceed 30% exposure
        let bets = vec![(0.75, 100), (0.70, 100), (0.65, 120), (0.60, 150)];

        let sizings = calc.calculate_multiple(&bets).unwrap();
        let total: f64 = sizings.iter().map(|s| s.stake).sum();

        assert_eq!(sizings.len(), 4);
        assert!(total <= 300.0 + 1e-9);
        assert!(sizings.iter().all(|s| s.stake > 0.0));
    }

    #[test]
    fn test_calculate_multiple_empty() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        let sizings = calc.calculate_multiple(&[]).unwrap();
        assert!(sizings.is_empty());
    }

    #[test]
    fn test_calculate_multiple_propagates_errors() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        assert!(calc.calculate_multiple(&[(0.6, 120), (0.6, 0)]).is_err());
    }

    #[test]
    fn test_kelly_calculator_new() {
        let calc = KellyCalculator::new(
            500.0, // bankroll
            0.5,   // kelly_multiplier (half Kelly)
            2.0,   // min_stake
            0.15,  // max_stake_pct
            0.25,  // max_total_exposure
        );

        assert!((calc.bankroll - 500.0).abs() < 0.001);
        assert!((calc.kelly_multiplier - 0.5).abs() < 0.001);
        assert!((calc.min_stake - 2.0).abs() < 0.001);
        assert!((calc.max_stake_pct - 0.15).abs() < 0.001);
        assert!((calc.max_total_exposure - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_update_bankroll() {
        let mut calc = KellyCalculator::with_defaults(1_000.0);

        calc.update_bankroll(50.0);
        assert!((calc.bankroll - 1_050.0).abs() < 1e-9);

        calc.update_bankroll(-30.0);
        assert!((calc.bankroll - 1_020.0).abs() < 1e-9);
    }
}
