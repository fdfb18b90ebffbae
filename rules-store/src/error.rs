//! Error types for the rules store

use crate::types::{EntryKind, RiskLevel};
use std::path::PathBuf;
use thiserror::Error;

/// Rules store error
#[derive(Debug, Error)]
pub enum Error {
    /// No persisted rule set exists; callers fall back to defaults
    #[error("no persisted rule set at {}", .path.display())]
    NotFound {
        /// Path that was probed
        path: PathBuf,
    },

    /// Filesystem failure while loading or saving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted rule set could not be parsed or written
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entry already present in the target list; state untouched
    #[error("'{value}' is already in the {level} {kind} list")]
    Duplicate {
        level: RiskLevel,
        kind: EntryKind,
        value: String,
    },

    /// Entry classified under another level; caller must confirm the move
    /// and issue an explicit remove + add pair
    #[error("'{value}' is currently classified as {existing} {kind}; remove it from that list before reclassifying")]
    MoveCandidate {
        existing: RiskLevel,
        kind: EntryKind,
        value: String,
    },

    /// Entry value was empty or otherwise unusable
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Rule-set invariants are violated; save is refused
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// A value classified under more than one risk level (or listed twice
/// within a single level)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: EntryKind,
    pub value: String,
    pub levels: Vec<RiskLevel>,
}

/// Invariant violations found by [`RuleSet::validate`](crate::RuleSet::validate)
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Values appearing in more than one level's list, partitioned by kind
    pub conflicts: Vec<Conflict>,

    /// `low_max >= medium_max`
    pub bad_score_thresholds: bool,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        for conflict in &self.conflicts {
            let levels: Vec<&str> = conflict.levels.iter().map(|l| l.key()).collect();
            parts.push(format!(
                "{} '{}' classified as {}",
                conflict.kind,
                conflict.value,
                levels.join(" and ")
            ));
        }
        if self.bad_score_thresholds {
            parts.push("risk score thresholds require low_max < medium_max".to_string());
        }
        if parts.is_empty() {
            "rule set is invalid".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_every_conflict() {
        let err = ValidationError {
            conflicts: vec![
                Conflict {
                    kind: EntryKind::Country,
                    value: "Iran".to_string(),
                    levels: vec![RiskLevel::Low, RiskLevel::High],
                },
                Conflict {
                    kind: EntryKind::Purpose,
                    value: "gambling".to_string(),
                    levels: vec![RiskLevel::Medium, RiskLevel::High],
                },
            ],
            bad_score_thresholds: false,
        };

        let message = err.to_string();
        assert!(message.contains("country 'Iran' classified as low and high"));
        assert!(message.contains("purpose 'gambling'"));
    }

    #[test]
    fn test_move_candidate_message_names_existing_level() {
        let err = Error::MoveCandidate {
            existing: RiskLevel::Medium,
            kind: EntryKind::Country,
            value: "Brazil".to_string(),
        };
        assert!(err.to_string().contains("Medium"));
        assert!(err.to_string().contains("Brazil"));
    }
}
