//! Supporting-document verification
//!
//! Document analysis itself is an external capability behind the
//! [`DocumentAnalyzer`] trait. This module fans submitted documents out to
//! the analyzer concurrently, bounds each call with a timeout, and folds the
//! outcomes into a deterministic aggregate: a failed or timed-out analysis
//! degrades that one document to "unverifiable" instead of failing the
//! assessment.

use crate::error::Result;
use crate::scoring::EvaluatorConfig;
use crate::types::Transaction;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The fixed set of supporting-document kinds accepted for review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Source of funds statement
    SourceOfFunds,
    /// Proof of identity (KYC)
    ProofOfIdentity,
    /// Proof of residency
    ProofOfResidency,
    /// Business registration / articles
    BusinessRegistration,
    /// Contracts, invoices, or payroll records
    ContractsInvoices,
}

impl DocumentKind {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::SourceOfFunds => "Source of Funds Statement",
            DocumentKind::ProofOfIdentity => "Proof of Identity (KYC)",
            DocumentKind::ProofOfResidency => "Proof of Residency",
            DocumentKind::BusinessRegistration => "Business Registration/Articles",
            DocumentKind::ContractsInvoices => "Contracts/Invoices/Payroll",
        }
    }
}

/// A document submitted alongside a transaction
#[derive(Debug, Clone)]
pub struct SupportingDocument {
    pub kind: DocumentKind,
    pub filename: String,
    pub content: Vec<u8>,
}

/// Quality rating assigned by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

/// Analyzer verdict for a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Whether the document corroborates the transaction details
    pub verified: bool,
    pub quality: DocumentQuality,
    /// Completeness assessment, free text
    pub completeness: String,
    pub red_flags: Vec<String>,
    pub inconsistencies: Vec<String>,
    /// Suggested score delta; clamped to the configured bounds on intake
    pub score_adjustment: i32,
    pub notes: String,
}

/// External document-analysis capability.
///
/// Implementations may call out to anything (an ML service, a human queue);
/// the evaluator only requires that failures surface as errors, which it
/// maps to unverifiable reviews.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze one document in the context of the transaction under review
    async fn analyze(
        &self,
        kind: DocumentKind,
        content: &[u8],
        transaction: &Transaction,
    ) -> Result<DocumentAnalysis>;
}

/// Outcome of reviewing a single submitted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Analyzer returned a verdict
    Analyzed(DocumentAnalysis),
    /// Analysis failed or timed out; the document contributes nothing
    Unverifiable { reason: String },
}

/// Review of one submitted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReview {
    pub kind: DocumentKind,
    pub filename: String,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
}

/// Overall verification standing across the submitted documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// At least 80% of analyzed documents verified
    Verified,
    /// At least 50% verified
    PartiallyVerified,
    /// Below 50%, or nothing could be analyzed
    Unverified,
}

/// Aggregated document-verification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVerification {
    /// Per-document reviews, in submission order
    pub reviews: Vec<DocumentReview>,

    /// Documents the analyzer returned a verdict for
    pub documents_analyzed: usize,

    /// Analyzed documents marked verified
    pub verified_count: usize,

    /// Percentage of analyzed documents verified (0.0-100.0)
    pub verification_rate: f64,

    pub overall: VerificationStatus,

    /// Net score delta, summed over analyzed documents after clamping
    pub score_adjustment: i32,

    pub adjustment_reason: String,
}

/// Run the analyzer over every submitted document and aggregate the results.
///
/// Analyses are issued concurrently but folded in submission order, so the
/// aggregate is deterministic for a given input sequence. Each call is
/// bounded by [`EvaluatorConfig::analysis_timeout`].
pub async fn verify_documents<A: DocumentAnalyzer + ?Sized>(
    analyzer: &A,
    documents: &[SupportingDocument],
    transaction: &Transaction,
    config: &EvaluatorConfig,
) -> DocumentVerification {
    let analyses = join_all(documents.iter().map(|doc| async move {
        match tokio::time::timeout(
            config.analysis_timeout,
            analyzer.analyze(doc.kind, &doc.content, transaction),
        )
        .await
        {
            Ok(Ok(mut analysis)) => {
                let raw = analysis.score_adjustment;
                analysis.score_adjustment = raw.clamp(
                    config.document_adjustment_min,
                    config.document_adjustment_max,
                );
                if analysis.score_adjustment != raw {
                    debug!(
                        "Clamped adjustment for {} from {} to {}",
                        doc.kind.label(),
                        raw,
                        analysis.score_adjustment
                    );
                }
                ReviewOutcome::Analyzed(analysis)
            }
            Ok(Err(e)) => {
                warn!("Analysis failed for {}: {}", doc.kind.label(), e);
                ReviewOutcome::Unverifiable {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    "Analysis timed out for {} after {:?}",
                    doc.kind.label(),
                    config.analysis_timeout
                );
                ReviewOutcome::Unverifiable {
                    reason: format!(
                        "analysis timed out after {} seconds",
                        config.analysis_timeout.as_secs()
                    ),
                }
            }
        }
    }))
    .await;

    let reviews: Vec<DocumentReview> = documents
        .iter()
        .zip(analyses)
        .map(|(doc, outcome)| DocumentReview {
            kind: doc.kind,
            filename: doc.filename.clone(),
            outcome,
        })
        .collect();

    let mut documents_analyzed = 0usize;
    let mut verified_count = 0usize;
    let mut score_adjustment = 0i32;

    for review in &reviews {
        if let ReviewOutcome::Analyzed(analysis) = &review.outcome {
            documents_analyzed += 1;
            if analysis.verified {
                verified_count += 1;
            }
            score_adjustment += analysis.score_adjustment;
        }
    }

    let verification_rate = if documents_analyzed > 0 {
        let rate = verified_count as f64 / documents_analyzed as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    } else {
        0.0
    };

    let overall = if documents_analyzed == 0 {
        VerificationStatus::Unverified
    } else if verification_rate >= 80.0 {
        VerificationStatus::Verified
    } else if verification_rate >= 50.0 {
        VerificationStatus::PartiallyVerified
    } else {
        VerificationStatus::Unverified
    };

    let adjustment_reason = format!(
        "{} of {} documents analyzed, {} verified; net adjustment {:+}",
        documents_analyzed,
        documents.len(),
        verified_count,
        score_adjustment
    );

    DocumentVerification {
        reviews,
        documents_analyzed,
        verified_count,
        verification_rate,
        overall,
        score_adjustment,
        adjustment_reason,
    }
}
