//! Compliance checklist generation
//!
//! Produces the follow-up actions a reviewing officer works through,
//! keyed off the assessed risk band and the classifications that fired.

use crate::types::Transaction;
use rules_store::{RiskLevel, RuleSet};
use rust_decimal::Decimal;

/// Build the ordered checklist for an assessed transaction
pub fn build_checklist(
    transaction: &Transaction,
    risk_level: RiskLevel,
    rules: &RuleSet,
) -> Vec<String> {
    let mut checklist = vec![
        "Verify customer identity (KYC)".to_string(),
        "Confirm transaction purpose".to_string(),
        "Check sanctions lists (OFAC, UN, EU)".to_string(),
    ];

    match risk_level {
        RiskLevel::High => {
            checklist.push("Escalate to compliance officer for manual review".to_string());
            checklist.push("Verify source of funds".to_string());
            checklist.push("Perform enhanced due diligence (EDD)".to_string());
            checklist.push("Check beneficial ownership information".to_string());
            checklist.push("Document business rationale".to_string());
        }
        RiskLevel::Medium => {
            checklist.push("Perform simplified due diligence (SDD)".to_string());
            checklist.push("Verify destination country compliance".to_string());
            if transaction.amount
                > Decimal::from(rules.amount_thresholds.high_risk_origin_threshold)
            {
                checklist.push("Document transaction rationale".to_string());
            }
        }
        RiskLevel::Low => {
            checklist.push("Standard AML checks sufficient".to_string());
        }
    }

    // Geographic follow-up for anything not explicitly low risk
    if rules.country_level(&transaction.source_country) != Some(RiskLevel::Low) {
        checklist.push(format!(
            "Research sanctions and regulatory status of {}",
            transaction.source_country
        ));
    }

    if rules.purpose_level(&transaction.purpose) == Some(RiskLevel::High) {
        checklist.push(format!(
            "Verify legitimacy of {} activity",
            transaction.purpose
        ));
    }

    checklist
}
