//! Prop Recommendation Ranking
//!
//! Orders model-scored player props by confidence, highest first. The sort
//! is stable, so equal confidences keep their input order. Grouping by bet
//! type is a read-only view over the ranked list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{validate_confidence, EngineError};

/// Side of a prop line the model recommends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropSide {
    Over,
    Under,
}

impl fmt::Display for PropSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropSide::Over => f.write_str("over"),
            PropSide::Under => f.write_str("under"),
        }
    }
}

/// A scored player prop bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropCandidate {
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub bet_type: String, // "strikeouts", "hits", "home_runs", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    pub recommendation: PropSide,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Props sharing a bet type, in ranked order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropGroup<'a> {
    pub bet_type: &'a str,
    pub props: Vec<&'a PropCandidate>,
}

/// Prop candidates sorted by confidence, descending
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedProps(Vec<PropCandidate>);

impl RankedProps {
    /// Validate and rank a set of candidates
    pub fn rank(mut candidates: Vec<PropCandidate>) -> Result<Self, EngineError> {
        for candidate in &candidates {
            validate_confidence(candidate.confidence)?;
        }

        // Vec::sort_by is stable
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(Self(candidates))
    }

    pub fn as_slice(&self) -> &[PropCandidate] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<PropCandidate> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropCandidate> {
        self.0.iter()
    }

    /// The `n` most confident props
    pub fn top(&self, n: usize) -> &[PropCandidate] {
        &self.0[..n.min(self.0.len())]
    }

    /// Group by bet type without reordering
    ///
    /// Groups appear in the order their bet type first shows up in the ranked
    /// list, so the group holding the single most confident prop comes first.
    pub fn by_bet_type(&self) -> Vec<PropGroup<'_>> {
        let mut groups: Vec<PropGroup<'_>> = Vec::new();

        for prop in &self.0 {
            match groups.iter().position(|g| g.bet_type == prop.bet_type) {
                Some(index) => groups[index].props.push(prop),
                None => groups.push(PropGroup {
                    bet_type: &prop.bet_type,
                    props: vec![prop],
                }),
            }
        }

        groups
    }
}

impl<'a> IntoIterator for &'a RankedProps {
    type Item = &'a PropCandidate;
    type IntoIter = std::slice::Iter<'a, PropCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rank candidates by confidence, descending
pub fn rank_props(candidates: Vec<PropCandidate>) -> Result<Vec<PropCandidate>, EngineError> {
    RankedProps::rank(candidates).map(RankedProps::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(player_id: &str, bet_type: &str, confidence: f64) -> PropCandidate {
        PropCandidate {
            player_id: player_id.to_string(),
            player_name: None,
            bet_type: bet_type.to_string(),
            line: Some(1.5),
            recommendation: PropSide::Over,
            confidence,
            reasoning: None,
        }
    }

    fn confidences(props: &[PropCandidate]) -> Vec<f64> {
        props.iter().map(|p| p.confidence).collect()
    }

    #[test]
    fn test_rank_props_descending() {
        let ranked = rank_props(vec![
            prop("p1", "hits", 0.55),
            prop("p2", "hits", 0.82),
            prop("p3", "hits", 0.70),
        ])
        .unwrap();

        assert_eq!(confidences(&ranked), vec![0.82, 0.70, 0.55]);
    }

    #[test]
    fn test_rank_props_stable_on_ties() {
        let ranked = rank_props(vec![
            prop("first", "hits", 0.70),
            prop("top", "strikeouts", 0.90),
            prop("second", "rbis", 0.70),
        ])
        .unwrap();

        let ids: Vec<&str> = ranked.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_rank_props_empty() {
        assert!(rank_props(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_rank_props_rejects_bad_confidence() {
        for bad in [0.0, 1.0, 1.2, -0.3, f64::NAN] {
            let result = rank_props(vec![prop("p1", "hits", 0.6), prop("p2", "hits", bad)]);
            assert!(
                matches!(result, Err(EngineError::InvalidConfidence(_))),
                "confidence {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_by_bet_type_preserves_order() {
        let ranked = RankedProps::rank(vec![
            prop("a", "hits", 0.60),
            prop("b", "strikeouts", 0.80),
            prop("c", "hits", 0.75),
            prop("d", "strikeouts", 0.65),
        ])
        .unwrap();

        let groups = ranked.by_bet_type();
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].bet_type, "strikeouts");
        let ids: Vec<&str> = groups[0].props.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);

        assert_eq!(groups[1].bet_type, "hits");
        let ids: Vec<&str> = groups[1].props.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        // Grouping leaves the ranked list untouched
        assert_eq!(confidences(ranked.as_slice()), vec![0.80, 0.75, 0.65, 0.60]);
    }

    #[test]
    fn test_top() {
        let ranked = RankedProps::rank(vec![
            prop("a", "hits", 0.60),
            prop("b", "hits", 0.80),
        ])
        .unwrap();

        assert_eq!(ranked.top(1).len(), 1);
        assert_eq!(ranked.top(1)[0].player_id, "b");
        assert_eq!(ranked.top(10).len(), 2);
    }

    #[test]
    fn test_prop_candidate_json() {
        let json = r#"{
            "playerId": "p-17",
            "playerName": "Player 1",
            "betType": "strikeouts",
            "line": 5.5,
            "recommendation": "over",
            "confidence": 0.75
        }"#;

        let candidate: PropCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.player_id, "p-17");
        assert_eq!(candidate.recommendation, PropSide::Over);
        assert_eq!(candidate.line, Some(5.5));
        assert!(candidate.reasoning.is_none());

        let out = serde_json::to_string(&candidate).unwrap();
        assert!(out.contains("\"betType\":\"strikeouts\""));
        assert!(!out.contains("reasoning"));
    }
}
