//! Rule set data model: classification lists, score weights, thresholds

use crate::error::{Conflict, Error, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level assigned to a country, purpose, or final transaction score.
///
/// Ordered so that `Low < Medium < High`; the highest level wins any
/// deterministic tie-break.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// All levels, highest first. Lookup order for classification lists.
    pub const DESCENDING: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    /// Lowercase name as used in list keys ("high", "medium", "low")
    pub fn key(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{}", s)
    }
}

/// Kind of classification entry a rule list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Country name lists
    Country,
    /// Transaction purpose lists
    Purpose,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryKind::Country => "country",
            EntryKind::Purpose => "purpose",
        };
        write!(f, "{}", s)
    }
}

/// Point values contributed per risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub high: u16,
    pub medium: u16,
    pub low: u16,
}

impl RiskScores {
    /// Points for the given level
    pub fn for_level(&self, level: RiskLevel) -> u16 {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }
}

/// Named amount breakpoints in USD.
///
/// Ordering (origin <= moderate <= general) is assumed by the default
/// configuration but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountThresholds {
    /// Amount at or above which a high-risk origin/destination escalates
    pub high_risk_origin_threshold: u64,

    /// Amount at or above which any transaction draws the general penalty
    pub general_high_threshold: u64,

    /// Amount at or above which any transaction draws the moderate penalty
    pub moderate_threshold: u64,
}

impl Default for AmountThresholds {
    fn default() -> Self {
        Self {
            high_risk_origin_threshold: 10_000,
            general_high_threshold: 25_000,
            moderate_threshold: 15_000,
        }
    }
}

/// Boundaries between the low/medium and medium/high score bands.
///
/// Invariant: `low_max < medium_max` (checked by [`RuleSet::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Highest score still considered low risk
    pub low_max: u8,

    /// Highest score still considered medium risk
    pub medium_max: u8,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            low_max: 30,
            medium_max: 70,
        }
    }
}

impl ScoreThresholds {
    /// Map a 0-100 score to a risk band. Boundaries are inclusive on the
    /// lower band: `score == low_max` is Low, `low_max + 1` is Medium.
    pub fn level_for(&self, score: u8) -> RiskLevel {
        if score <= self.low_max {
            RiskLevel::Low
        } else if score <= self.medium_max {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// The editable risk-classification configuration.
///
/// A `RuleSet` is a value: evaluation code receives an immutable snapshot
/// and mutation goes through [`add_entry`](RuleSet::add_entry) /
/// [`remove_entry`](RuleSet::remove_entry) on a working copy held by the
/// store. The serialized form is a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub high_risk_countries: Vec<String>,
    pub medium_risk_countries: Vec<String>,
    pub low_risk_countries: Vec<String>,

    pub high_risk_purposes: Vec<String>,
    pub medium_risk_purposes: Vec<String>,
    pub low_risk_purposes: Vec<String>,

    pub amount_thresholds: AmountThresholds,
    pub risk_score_thresholds: ScoreThresholds,

    pub country_risk_scores: RiskScores,
    pub purpose_risk_scores: RiskScores,
    pub customer_type_scores: RiskScores,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            high_risk_countries: vec![
                "Cayman Islands".to_string(),
                "Nigeria".to_string(),
                "Syria".to_string(),
                "Iran".to_string(),
                "North Korea".to_string(),
            ],
            medium_risk_countries: vec![
                "Vietnam".to_string(),
                "Indonesia".to_string(),
                "India".to_string(),
            ],
            low_risk_countries: vec![
                "Singapore".to_string(),
                "United Kingdom".to_string(),
                "Philippines".to_string(),
                "United States".to_string(),
            ],
            high_risk_purposes: vec![
                "investment".to_string(),
                "gambling".to_string(),
                "crypto trading".to_string(),
            ],
            medium_risk_purposes: vec![
                "trade finance".to_string(),
                "remittance".to_string(),
            ],
            low_risk_purposes: vec!["payroll".to_string(), "services".to_string()],
            amount_thresholds: AmountThresholds::default(),
            risk_score_thresholds: ScoreThresholds::default(),
            country_risk_scores: RiskScores {
                high: 35,
                medium: 18,
                low: 5,
            },
            purpose_risk_scores: RiskScores {
                high: 28,
                medium: 15,
                low: 3,
            },
            customer_type_scores: RiskScores {
                high: 40,
                medium: 15,
                low: 5,
            },
        }
    }
}

impl RuleSet {
    /// Classification list for a kind at a level
    pub fn list(&self, kind: EntryKind, level: RiskLevel) -> &[String] {
        match (kind, level) {
            (EntryKind::Country, RiskLevel::High) => &self.high_risk_countries,
            (EntryKind::Country, RiskLevel::Medium) => &self.medium_risk_countries,
            (EntryKind::Country, RiskLevel::Low) => &self.low_risk_countries,
            (EntryKind::Purpose, RiskLevel::High) => &self.high_risk_purposes,
            (EntryKind::Purpose, RiskLevel::Medium) => &self.medium_risk_purposes,
            (EntryKind::Purpose, RiskLevel::Low) => &self.low_risk_purposes,
        }
    }

    fn list_mut(&mut self, kind: EntryKind, level: RiskLevel) -> &mut Vec<String> {
        match (kind, level) {
            (EntryKind::Country, RiskLevel::High) => &mut self.high_risk_countries,
            (EntryKind::Country, RiskLevel::Medium) => &mut self.medium_risk_countries,
            (EntryKind::Country, RiskLevel::Low) => &mut self.low_risk_countries,
            (EntryKind::Purpose, RiskLevel::High) => &mut self.high_risk_purposes,
            (EntryKind::Purpose, RiskLevel::Medium) => &mut self.medium_risk_purposes,
            (EntryKind::Purpose, RiskLevel::Low) => &mut self.low_risk_purposes,
        }
    }

    /// Normalized form an entry is stored and compared under. Purposes are
    /// case-insensitive; countries match exactly after trimming.
    fn normalize(kind: EntryKind, value: &str) -> String {
        let trimmed = value.trim();
        match kind {
            EntryKind::Country => trimmed.to_string(),
            EntryKind::Purpose => trimmed.to_lowercase(),
        }
    }

    /// Level a country is classified under, if any.
    ///
    /// Checks high first so that a duplicate classification (which
    /// `validate` would reject) still resolves deterministically to the
    /// highest level.
    pub fn country_level(&self, country: &str) -> Option<RiskLevel> {
        let needle = Self::normalize(EntryKind::Country, country);
        RiskLevel::DESCENDING
            .into_iter()
            .find(|level| self.list(EntryKind::Country, *level).iter().any(|c| *c == needle))
    }

    /// Level a purpose is classified under, if any. Case-insensitive.
    pub fn purpose_level(&self, purpose: &str) -> Option<RiskLevel> {
        let needle = Self::normalize(EntryKind::Purpose, purpose);
        RiskLevel::DESCENDING
            .into_iter()
            .find(|level| self.list(EntryKind::Purpose, *level).iter().any(|p| *p == needle))
    }

    /// Level a value of the given kind is classified under, if any
    pub fn entry_level(&self, kind: EntryKind, value: &str) -> Option<RiskLevel> {
        match kind {
            EntryKind::Country => self.country_level(value),
            EntryKind::Purpose => self.purpose_level(value),
        }
    }

    /// Add a classification entry.
    ///
    /// Returns [`Error::Duplicate`] when the value is already in the target
    /// list, and [`Error::MoveCandidate`] when it is classified under a
    /// different level. Reclassification is never implicit: the caller must
    /// confirm, `remove_entry` from the old level, then `add_entry` again.
    pub fn add_entry(&mut self, level: RiskLevel, kind: EntryKind, value: &str) -> Result<()> {
        let normalized = Self::normalize(kind, value);
        if normalized.is_empty() {
            return Err(Error::InvalidEntry(format!(
                "blank {} entry rejected",
                kind
            )));
        }

        if let Some(existing) = self.entry_level(kind, &normalized) {
            if existing == level {
                return Err(Error::Duplicate {
                    level,
                    kind,
                    value: normalized,
                });
            }
            return Err(Error::MoveCandidate {
                existing,
                kind,
                value: normalized,
            });
        }

        self.list_mut(kind, level).push(normalized);
        Ok(())
    }

    /// Remove a classification entry. Idempotent: removing a value that is
    /// not present is a no-op. Returns whether anything was removed.
    pub fn remove_entry(&mut self, level: RiskLevel, kind: EntryKind, value: &str) -> bool {
        let normalized = Self::normalize(kind, value);
        let list = self.list_mut(kind, level);
        let before = list.len();
        list.retain(|v| *v != normalized);
        list.len() != before
    }

    /// Check the rule-set invariants.
    ///
    /// Reports every value classified under more than one level (or listed
    /// twice within one level), partitioned by kind, and rejects score
    /// thresholds where `low_max >= medium_max`.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut conflicts = Vec::new();

        for kind in [EntryKind::Country, EntryKind::Purpose] {
            let mut seen: Vec<(String, Vec<RiskLevel>)> = Vec::new();

            for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
                for value in self.list(kind, level) {
                    let normalized = Self::normalize(kind, value);
                    match seen.iter_mut().find(|(v, _)| *v == normalized) {
                        Some((_, levels)) => levels.push(level),
                        None => seen.push((normalized, vec![level])),
                    }
                }
            }

            for (value, levels) in seen {
                if levels.len() > 1 {
                    conflicts.push(Conflict {
                        kind,
                        value,
                        levels,
                    });
                }
            }
        }

        let bad_thresholds =
            self.risk_score_thresholds.low_max >= self.risk_score_thresholds.medium_max;

        if conflicts.is_empty() && !bad_thresholds {
            Ok(())
        } else {
            Err(ValidationError {
                conflicts,
                bad_score_thresholds: bad_thresholds,
            })
        }
    }
}
