//! Rule-based risk scoring engine

use crate::checklist::build_checklist;
use crate::documents::{verify_documents, DocumentAnalyzer, SupportingDocument};
use crate::error::Result;
use crate::types::{AssessmentResult, CustomerType, RiskScore, ScoreAdjustment, Transaction};
use rules_store::{RiskLevel, RuleSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Fixed scoring constants that sit outside the editable rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Penalty when a high-risk country is involved and the amount reaches
    /// the high-risk-origin threshold
    pub high_risk_origin_penalty: u16,

    /// Penalty when the amount reaches the general high threshold
    pub general_high_penalty: u16,

    /// Penalty when the amount reaches the moderate threshold
    pub moderate_penalty: u16,

    /// Bump applied when structuring signals are present
    pub structuring_penalty: u16,

    /// Floor for a single document's score adjustment
    pub document_adjustment_min: i32,

    /// Ceiling for a single document's score adjustment
    pub document_adjustment_max: i32,

    /// Upper bound on a single document-analysis call
    pub analysis_timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            high_risk_origin_penalty: 40,
            general_high_penalty: 25,
            moderate_penalty: 15,
            structuring_penalty: 15,
            document_adjustment_min: -10,
            document_adjustment_max: 15,
            analysis_timeout: Duration::from_secs(10),
        }
    }
}

// A scored factor: points plus the sentence the rationale builds from
struct Contribution {
    points: i64,
    sentence: String,
}

/// Risk evaluator
///
/// [`evaluate`](RiskEvaluator::evaluate) is a pure function of the
/// transaction and the rule-set snapshot it is handed; the evaluator itself
/// holds only fixed configuration and no per-call state, so one instance can
/// serve concurrent assessments.
pub struct RiskEvaluator {
    config: EvaluatorConfig,
}

impl RiskEvaluator {
    /// Create an evaluator with the given constants
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// The evaluator's configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Assess a transaction against a rule-set snapshot.
    ///
    /// Contributions are collected in a fixed order (source country,
    /// destination country, purpose, counterparty, amount, structuring);
    /// every non-zero contribution produces a triggered-rule entry in that
    /// order. Unknown countries and purposes are neutral: they contribute
    /// zero rather than defaulting to a penalty.
    pub fn evaluate(&self, transaction: &Transaction, rules: &RuleSet) -> Result<AssessmentResult> {
        transaction.validate()?;

        let mut triggered_rules: Vec<String> = Vec::new();
        let mut contributions: Vec<Contribution> = Vec::new();

        // 1. Source country
        let source_level = rules.country_level(&transaction.source_country);
        if let Some(level) = source_level {
            let points = rules.country_risk_scores.for_level(level) as i64;
            if points > 0 {
                triggered_rules.push(format!(
                    "Source country '{}' classified as {}-risk",
                    transaction.source_country,
                    level.key()
                ));
                contributions.push(Contribution {
                    points,
                    sentence: format!(
                        "Source country {} is on the {}-risk list.",
                        transaction.source_country,
                        level.key()
                    ),
                });
            }
        }

        // 2. Destination country
        let destination_level = rules.country_level(&transaction.destination_country);
        if let Some(level) = destination_level {
            let points = rules.country_risk_scores.for_level(level) as i64;
            if points > 0 {
                triggered_rules.push(format!(
                    "Destination country '{}' classified as {}-risk",
                    transaction.destination_country,
                    level.key()
                ));
                contributions.push(Contribution {
                    points,
                    sentence: format!(
                        "Destination country {} is on the {}-risk list.",
                        transaction.destination_country,
                        level.key()
                    ),
                });
            }
        }

        // 3. Purpose
        if let Some(level) = rules.purpose_level(&transaction.purpose) {
            let points = rules.purpose_risk_scores.for_level(level) as i64;
            if points > 0 {
                triggered_rules.push(format!(
                    "Transaction purpose '{}' classified as {}-risk",
                    transaction.purpose,
                    level.key()
                ));
                contributions.push(Contribution {
                    points,
                    sentence: format!(
                        "Transaction purpose '{}' is classified as {}-risk.",
                        transaction.purpose,
                        level.key()
                    ),
                });
            }
        }

        // 4. Counterparty profile
        let customer = transaction.customer_type();
        let customer_points = rules.customer_type_scores.for_level(customer.level()) as i64;
        if customer_points > 0 {
            let (rule, sentence) = match customer {
                CustomerType::High => (
                    "Counterparty classified as PEP/NGO (high-risk profile)".to_string(),
                    "Customer classified as PEP/NGO profile (elevated risk).".to_string(),
                ),
                _ => (
                    format!(
                        "Counterparty profile classified as {}-risk",
                        customer.level().key()
                    ),
                    format!(
                        "Counterparty profile carries a {}-risk weighting.",
                        customer.level().key()
                    ),
                ),
            };
            triggered_rules.push(rule);
            contributions.push(Contribution {
                points: customer_points,
                sentence,
            });
        }

        // 5. Amount thresholds. One branch applies: the high-risk-origin
        // escalation takes precedence, then the general and moderate bands.
        let thresholds = &rules.amount_thresholds;
        let involves_high_risk_country =
            source_level == Some(RiskLevel::High) || destination_level == Some(RiskLevel::High);

        let amount = transaction.amount;
        if involves_high_risk_country
            && amount >= Decimal::from(thresholds.high_risk_origin_threshold)
        {
            triggered_rules.push(format!(
                "Amount ${} exceeds ${} from high-risk country",
                amount, thresholds.high_risk_origin_threshold
            ));
            contributions.push(Contribution {
                points: self.config.high_risk_origin_penalty as i64,
                sentence: format!(
                    "Transaction amount (${}) meets the ${} high-risk-origin threshold.",
                    amount, thresholds.high_risk_origin_threshold
                ),
            });
        } else if amount >= Decimal::from(thresholds.general_high_threshold) {
            triggered_rules.push(format!(
                "Amount ${} exceeds ${} threshold",
                amount, thresholds.general_high_threshold
            ));
            contributions.push(Contribution {
                points: self.config.general_high_penalty as i64,
                sentence: format!(
                    "Transaction amount (${}) exceeds the ${} threshold.",
                    amount, thresholds.general_high_threshold
                ),
            });
        } else if amount >= Decimal::from(thresholds.moderate_threshold) {
            triggered_rules.push(format!(
                "Amount ${} is above moderate threshold (${})",
                amount, thresholds.moderate_threshold
            ));
            contributions.push(Contribution {
                points: self.config.moderate_penalty as i64,
                sentence: format!(
                    "Transaction amount (${}) is above the moderate threshold (${}).",
                    amount, thresholds.moderate_threshold
                ),
            });
        }

        // 6. Structuring signals
        if transaction.has_structuring_signals() {
            triggered_rules
                .push("Structuring signals detected (multiple small transactions)".to_string());
            contributions.push(Contribution {
                points: self.config.structuring_penalty as i64,
                sentence: "Potential structuring behavior detected.".to_string(),
            });
        }

        let total: i64 = contributions.iter().map(|c| c.points).sum();
        let risk_score = RiskScore::from_total(total);
        let risk_level = rules.risk_score_thresholds.level_for(risk_score.score());

        debug!(
            "Assessed {} -> {} transfer: score {} ({})",
            transaction.source_country,
            transaction.destination_country,
            risk_score.score(),
            risk_level
        );

        let rationale = build_rationale(&contributions);
        let checklist_items = build_checklist(transaction, risk_level, rules);

        Ok(AssessmentResult {
            risk_score,
            risk_level,
            triggered_rules,
            rationale,
            checklist_items,
            score_adjustment: None,
            document_verification: None,
            assessed_at: chrono::Utc::now(),
        })
    }

    /// Assess a transaction, then adjust the score with supporting-document
    /// verification.
    ///
    /// Document analyses that fail or time out degrade to unverifiable
    /// reviews; the assessment always completes, falling back to the
    /// unadjusted score when nothing could be analyzed.
    pub async fn evaluate_with_documents<A: DocumentAnalyzer + ?Sized>(
        &self,
        transaction: &Transaction,
        rules: &RuleSet,
        analyzer: &A,
        documents: &[SupportingDocument],
    ) -> Result<AssessmentResult> {
        let mut result = self.evaluate(transaction, rules)?;
        if documents.is_empty() {
            return Ok(result);
        }

        let verification =
            verify_documents(analyzer, documents, transaction, &self.config).await;

        if verification.documents_analyzed > 0 {
            let original_score = result.risk_score.score();
            let adjustment = verification.score_adjustment;
            let final_score =
                RiskScore::from_total(original_score as i64 + adjustment as i64);

            result.risk_level = rules.risk_score_thresholds.level_for(final_score.score());
            if adjustment > 0 {
                result.rationale.push_str(&format!(
                    " DOCUMENT ALERT: Risk increased by {} points due to document concerns.",
                    adjustment
                ));
            } else if adjustment < 0 {
                result.rationale.push_str(&format!(
                    " Documents verified successfully, risk reduced by {} points.",
                    adjustment.abs()
                ));
            }
            result.score_adjustment = Some(ScoreAdjustment {
                original_score,
                adjustment,
                final_score: final_score.score(),
                reason: verification.adjustment_reason.clone(),
            });
            result.risk_score = final_score;
        }

        result.document_verification = Some(verification);
        Ok(result)
    }
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

// Rationale leads with the dominant contribution (ties broken by evaluation
// order), then the remaining context in order.
fn build_rationale(contributions: &[Contribution]) -> String {
    if contributions.is_empty() {
        return "Transaction meets low-risk criteria.".to_string();
    }

    // Strictly-greater comparison keeps the earliest factor on ties
    let mut dominant = 0;
    for (i, contribution) in contributions.iter().enumerate() {
        if contribution.points > contributions[dominant].points {
            dominant = i;
        }
    }

    let mut parts = Vec::with_capacity(contributions.len());
    parts.push(contributions[dominant].sentence.clone());
    for (i, contribution) in contributions.iter().enumerate() {
        if i != dominant {
            parts.push(contribution.sentence.clone());
        }
    }
    parts.join(" ")
}
