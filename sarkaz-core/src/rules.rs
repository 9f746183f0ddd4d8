//! Scoring rule configuration.
//!
//! The defaults encode the competition ruleset. A different ruleset can be
//! loaded from JSON; any field left out keeps its default.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Multipliers for emergency and hidden operation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationRules {
    pub perfect_multiplier: f64,
    pub refresh_multiplier: f64,
    /// Replaces `refresh_multiplier` while the death-feud collectible is held.
    pub feud_refresh_multiplier: f64,
    pub hidden_imperfect_multiplier: f64,
}

/// Penalties for holding several king collectibles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KingsRules {
    /// Applied for every owned piece after the first.
    pub per_extra_piece: f64,
    /// Owned pieces needed before the crown's extra penalty applies.
    pub crown_threshold: usize,
    pub crown_penalty: f64,
    pub full_set_penalty: f64,
}

/// Settlement counters entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementRules {
    /// Points per collection while the doodle collectible is held.
    pub doodle_points_per_collection: f64,
    pub hidden_kill_points: f64,
    pub refresh_cap: u32,
    pub blueprint_refresh_cap: u32,
    pub refresh_penalty: f64,
    pub withdraw_cap: u32,
    pub withdraw_penalty: f64,
    pub base_score_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub operations: OperationRules,
    pub kings: KingsRules,
    pub settlement: SettlementRules,
}

impl Default for OperationRules {
    fn default() -> Self {
        Self {
            perfect_multiplier: 1.2,
            refresh_multiplier: 0.3,
            feud_refresh_multiplier: 0.1,
            hidden_imperfect_multiplier: 0.5,
        }
    }
}

impl Default for KingsRules {
    fn default() -> Self {
        Self {
            per_extra_piece: -20.0,
            crown_threshold: 3,
            crown_penalty: -40.0,
            full_set_penalty: -20.0,
        }
    }
}

impl Default for SettlementRules {
    fn default() -> Self {
        Self {
            doodle_points_per_collection: 3.0,
            hidden_kill_points: 10.0,
            refresh_cap: 8,
            blueprint_refresh_cap: 15,
            refresh_penalty: -50.0,
            withdraw_cap: 40,
            withdraw_penalty: -50.0,
            base_score_weight: 0.5,
        }
    }
}

impl ScoreRules {
    /// Load rules from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The process-wide default ruleset.
    #[must_use]
    pub fn standard() -> &'static Self {
        static RULES: OnceLock<ScoreRules> = OnceLock::new();
        RULES.get_or_init(Self::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let rules = ScoreRules::from_json(
            r#"{
                "settlement": { "refresh_cap": 10 },
                "kings": { "crown_penalty": -60 }
            }"#,
        )
        .unwrap();
        assert_eq!(rules.settlement.refresh_cap, 10);
        assert_eq!(rules.settlement.withdraw_cap, 40);
        assert!((rules.kings.crown_penalty + 60.0).abs() < f64::EPSILON);
        assert_eq!(rules.operations, OperationRules::default());
    }

    #[test]
    fn empty_object_is_the_standard_ruleset() {
        let rules = ScoreRules::from_json("{}").unwrap();
        assert_eq!(&rules, ScoreRules::standard());
    }

    #[test]
    fn malformed_rules_are_rejected() {
        assert!(ScoreRules::from_json(r#"{"settlement": {"refresh_cap": "many"}}"#).is_err());
    }
}
