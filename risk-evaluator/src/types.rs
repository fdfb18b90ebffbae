//! Core types for transaction risk assessment

use crate::documents::DocumentVerification;
use crate::error::{Error, Result};
use rules_store::RiskLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score, clamped to 0-100
    pub fn new(score: u8) -> Self {
        Self(score.min(100))
    }

    /// Clamp an unbounded sum of contributions into the 0-100 range
    pub fn from_total(total: i64) -> Self {
        Self(total.clamp(0, 100) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }
}

/// Customer classification tier derived from the counterparty type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// Freelancers and comparable individual senders
    Low,
    /// SMBs and corporates
    Medium,
    /// PEP/NGO profiles
    High,
}

impl CustomerType {
    /// Map a free-form counterparty label to a tier. Unknown labels default
    /// to medium.
    pub fn from_counterparty(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "freelancer" => CustomerType::Low,
            "smb" | "corporate" => CustomerType::Medium,
            "ngo" | "pep" => CustomerType::High,
            _ => CustomerType::Medium,
        }
    }

    /// Corresponding rule-set risk level
    pub fn level(&self) -> RiskLevel {
        match self {
            CustomerType::Low => RiskLevel::Low,
            CustomerType::Medium => RiskLevel::Medium,
            CustomerType::High => RiskLevel::High,
        }
    }
}

/// Transaction submitted for compliance review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in USD
    pub amount: Decimal,

    /// Currency code (informational; amounts are normalized to USD upstream)
    pub currency: String,

    /// Origin country
    pub source_country: String,

    /// Destination country
    pub destination_country: String,

    /// Stated purpose of the transfer
    pub purpose: String,

    /// Counterparty type label (freelancer, smb, corporate, ngo, ...)
    pub counterparty_type: String,

    /// Free-text history notes; any non-blank content is treated as a
    /// structuring signal
    #[serde(default)]
    pub history_signals: String,
}

impl Transaction {
    /// Validate required fields before evaluation
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.source_country.trim().is_empty() {
            return Err(Error::MissingField("source_country"));
        }
        if self.destination_country.trim().is_empty() {
            return Err(Error::MissingField("destination_country"));
        }
        if self.purpose.trim().is_empty() {
            return Err(Error::MissingField("purpose"));
        }
        if self.counterparty_type.trim().is_empty() {
            return Err(Error::MissingField("counterparty_type"));
        }
        Ok(())
    }

    /// Customer tier for this transaction's counterparty
    pub fn customer_type(&self) -> CustomerType {
        CustomerType::from_counterparty(&self.counterparty_type)
    }

    /// Whether the history notes indicate possible structuring
    pub fn has_structuring_signals(&self) -> bool {
        !self.history_signals.trim().is_empty()
    }
}

/// Score adjustment applied after document verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// Score before document review
    pub original_score: u8,

    /// Net delta from document verification
    pub adjustment: i32,

    /// Score after clamping the adjusted total
    pub final_score: u8,

    /// Why the adjustment was applied
    pub reason: String,
}

/// Result of a compliance risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Final risk score
    pub risk_score: RiskScore,

    /// Risk band the score falls in
    pub risk_level: RiskLevel,

    /// Every rule that contributed non-zero score, in evaluation order
    pub triggered_rules: Vec<String>,

    /// Natural-language summary, led by the dominant contributing factor
    pub rationale: String,

    /// Follow-up actions for the reviewing officer
    pub checklist_items: Vec<String>,

    /// Present when supporting documents changed the score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_adjustment: Option<ScoreAdjustment>,

    /// Present when supporting documents were reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_verification: Option<DocumentVerification>,

    /// Assessment timestamp
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_transaction() -> Transaction {
        Transaction {
            amount: Decimal::from(3_000),
            currency: "USD".to_string(),
            source_country: "Singapore".to_string(),
            destination_country: "Philippines".to_string(),
            purpose: "services".to_string(),
            counterparty_type: "freelancer".to_string(),
            history_signals: String::new(),
        }
    }

    #[test]
    fn test_risk_score_clamps_at_100() {
        assert_eq!(RiskScore::new(250).score(), 100);
        assert_eq!(RiskScore::from_total(173).score(), 100);
        assert_eq!(RiskScore::from_total(-12).score(), 0);
        assert_eq!(RiskScore::from_total(55).score(), 55);
    }

    #[test]
    fn test_counterparty_mapping() {
        assert_eq!(
            CustomerType::from_counterparty("freelancer"),
            CustomerType::Low
        );
        assert_eq!(CustomerType::from_counterparty("SMB"), CustomerType::Medium);
        assert_eq!(
            CustomerType::from_counterparty("corporate"),
            CustomerType::Medium
        );
        assert_eq!(CustomerType::from_counterparty("NGO"), CustomerType::High);
        // Unknown labels default to medium
        assert_eq!(
            CustomerType::from_counterparty("individual"),
            CustomerType::Medium
        );
    }

    #[test]
    fn test_transaction_validation() {
        assert!(base_transaction().validate().is_ok());

        let mut tx = base_transaction();
        tx.amount = Decimal::ZERO;
        assert!(matches!(tx.validate(), Err(Error::InvalidAmount(_))));

        let mut tx = base_transaction();
        tx.source_country = "  ".to_string();
        assert!(matches!(
            tx.validate(),
            Err(Error::MissingField("source_country"))
        ));

        let mut tx = base_transaction();
        tx.purpose = String::new();
        assert!(matches!(tx.validate(), Err(Error::MissingField("purpose"))));
    }

    #[test]
    fn test_assessment_result_json_shape() {
        let result = AssessmentResult {
            risk_score: RiskScore::new(18),
            risk_level: RiskLevel::Low,
            triggered_rules: vec!["Source country 'Singapore' classified as low-risk".to_string()],
            rationale: "Transaction meets low-risk criteria.".to_string(),
            checklist_items: vec!["Verify customer identity (KYC)".to_string()],
            score_adjustment: None,
            document_verification: None,
            assessed_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["risk_score"], 18);
        assert_eq!(json["risk_level"], "low");
        assert!(json["triggered_rules"].is_array());
        // Absent sections are omitted, not serialized as null
        assert!(json.get("score_adjustment").is_none());
        assert!(json.get("document_verification").is_none());
    }

    #[test]
    fn test_structuring_signal_detection() {
        let mut tx = base_transaction();
        assert!(!tx.has_structuring_signals());

        tx.history_signals = "multiple small transactions under $10k".to_string();
        assert!(tx.has_structuring_signals());

        tx.history_signals = "   ".to_string();
        assert!(!tx.has_structuring_signals());
    }
}
