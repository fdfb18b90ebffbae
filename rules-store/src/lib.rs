//! Risk-classification rule store
//!
//! Holds the editable AML rule configuration: country and purpose lists per
//! risk level, scoring weights, and amount/score thresholds. Enforces the
//! disjointness invariant before anything is persisted.

pub mod error;
pub mod store;
pub mod types;

pub use error::{Conflict, Error, Result, ValidationError};
pub use store::RulesStore;
pub use types::{AmountThresholds, EntryKind, RiskLevel, RiskScores, RuleSet, ScoreThresholds};
