//! In-memory assessment history

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use risk_evaluator::{AssessmentResult, RiskLevel, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// A completed assessment with the transaction it reviewed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub transaction: Transaction,
    pub result: AssessmentResult,
}

/// Per-band assessment counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Summary statistics over the recorded assessments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStatistics {
    pub total_assessments: usize,
    pub risk_breakdown: RiskBreakdown,
    pub average_risk_score: f64,
}

/// Concurrency-safe, in-memory log of completed assessments.
///
/// Records are kept for the lifetime of the process only; history review
/// and statistics read from here, nothing is persisted.
pub struct AssessmentLog {
    records: DashMap<Uuid, AssessmentRecord>,
    // Insertion order, newest last
    order: RwLock<Vec<Uuid>>,
}

impl AssessmentLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Record a completed assessment, returning its identifier
    pub fn record(&self, transaction: Transaction, result: AssessmentResult) -> Uuid {
        let assessment_id = Uuid::new_v4();
        let record = AssessmentRecord {
            assessment_id,
            recorded_at: Utc::now(),
            transaction,
            result,
        };

        // Hold the order lock across both writes so a concurrent reader
        // never sees an ID without its record
        let mut order = self.order.write();
        self.records.insert(assessment_id, record);
        order.push(assessment_id);

        debug!("Recorded assessment {}", assessment_id);
        assessment_id
    }

    /// Fetch a single assessment by ID
    pub fn get(&self, assessment_id: Uuid) -> Option<AssessmentRecord> {
        self.records.get(&assessment_id).map(|r| r.value().clone())
    }

    /// Page through assessments, newest first
    pub fn recent(&self, limit: usize, offset: usize) -> Vec<AssessmentRecord> {
        let order = self.order.read();
        order
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .filter_map(|id| self.records.get(id).map(|r| r.value().clone()))
            .collect()
    }

    /// Number of recorded assessments
    pub fn len(&self) -> usize {
        self.order.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summary statistics across all recorded assessments
    pub fn statistics(&self) -> LogStatistics {
        let order = self.order.read();
        let mut breakdown = RiskBreakdown::default();
        let mut score_sum = 0u64;
        let mut counted = 0usize;

        for id in order.iter() {
            if let Some(record) = self.records.get(id) {
                match record.result.risk_level {
                    RiskLevel::Low => breakdown.low += 1,
                    RiskLevel::Medium => breakdown.medium += 1,
                    RiskLevel::High => breakdown.high += 1,
                }
                score_sum += record.result.risk_score.score() as u64;
                counted += 1;
            }
        }

        let average_risk_score = if counted > 0 {
            let avg = score_sum as f64 / counted as f64;
            (avg * 100.0).round() / 100.0
        } else {
            0.0
        };

        LogStatistics {
            total_assessments: counted,
            risk_breakdown: breakdown,
            average_risk_score,
        }
    }

    /// Drop every recorded assessment
    pub fn clear(&self) {
        let mut order = self.order.write();
        self.records.clear();
        order.clear();
    }
}

impl Default for AssessmentLog {
    fn default() -> Self {
        Self::new()
    }
}
