//! Engine configuration
//!
//! Feature weights and the piece subsets each feature extractor looks at.
//! Loadable from JSON; missing fields fall back to the defaults.

use crate::error::{EngineError, EngineResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Multipliers applied to each feature count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub mobility: i32,
    pub threats: i32,
    pub open_lines: i32,
    pub pawn_structure: i32,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            mobility: 10,
            threats: 20,
            open_lines: 15,
            pawn_structure: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: FeatureWeights,

    // Piece subsets (type codes, PAWN=1 .. KING=6)
    pub mobility_pieces: Vec<u8>,
    pub threat_pieces: Vec<u8>,
    pub open_line_pieces: Vec<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            mobility_pieces: vec![PAWN, QUEEN],
            threat_pieces: vec![PAWN, QUEEN],
            open_line_pieces: vec![ROOK, QUEEN],
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let json_str = std::fs::read_to_string(path)?;
        Self::load_from_json(&json_str)
    }

    /// Reject piece subsets naming unknown piece types and negative weights
    pub fn validate(&self) -> EngineResult<()> {
        let subsets = [
            ("mobility_pieces", &self.mobility_pieces),
            ("threat_pieces", &self.threat_pieces),
            ("open_line_pieces", &self.open_line_pieces),
        ];
        for (name, subset) in subsets {
            if let Some(bad) = subset.iter().find(|&&pt| !is_piece_type(pt)) {
                return Err(EngineError::InvalidConfig {
                    reason: format!("{} contains unknown piece type {}", name, bad),
                });
            }
        }

        let w = &self.weights;
        if w.mobility < 0 || w.threats < 0 || w.open_lines < 0 || w.pawn_structure < 0 {
            return Err(EngineError::InvalidConfig {
                reason: "feature weights must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::load_from_json(r#"{ "mobility_pieces": [2, 3] }"#).unwrap();
        assert_eq!(config.mobility_pieces, vec![KNIGHT, BISHOP]);
        assert_eq!(config.threat_pieces, vec![PAWN, QUEEN]);
        assert_eq!(config.weights, FeatureWeights::default());
    }

    #[test]
    fn weights_override_individually() {
        let config = EngineConfig::load_from_json(r#"{ "weights": { "threats": 40 } }"#).unwrap();
        assert_eq!(config.weights.threats, 40);
        assert_eq!(config.weights.mobility, 10);
    }

    #[test]
    fn unknown_piece_type_is_rejected() {
        let err = EngineConfig::load_from_json(r#"{ "open_line_pieces": [4, 9] }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = EngineConfig::load_from_json(r#"{ "weights": { "mobility": -1 } }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_json_surfaces_parse_error() {
        let err = EngineConfig::load_from_json("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
