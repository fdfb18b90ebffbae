//! Assessment history
//!
//! Keeps completed compliance assessments in memory for review and summary
//! statistics. Storage is process-local; nothing here touches disk.

pub mod log;

pub use log::{AssessmentLog, AssessmentRecord, LogStatistics, RiskBreakdown};
