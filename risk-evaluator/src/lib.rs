//! Transaction risk evaluation
//!
//! Rule-based AML/KYC risk assessment for money transfers: scores a
//! transaction against a rule-set snapshot, bands the score into a risk
//! level, and optionally adjusts it with supporting-document verification.

#![forbid(unsafe_code)]

pub mod checklist;
pub mod documents;
pub mod error;
pub mod scoring;
pub mod types;

pub use documents::{
    DocumentAnalysis, DocumentAnalyzer, DocumentKind, DocumentQuality, DocumentReview,
    DocumentVerification, ReviewOutcome, SupportingDocument, VerificationStatus,
};
pub use error::{Error, Result};
pub use scoring::{EvaluatorConfig, RiskEvaluator};
pub use types::{AssessmentResult, CustomerType, RiskScore, ScoreAdjustment, Transaction};

// The rule-set types travel with assessments; re-export for downstream crates
pub use rules_store::{RiskLevel, RuleSet};
