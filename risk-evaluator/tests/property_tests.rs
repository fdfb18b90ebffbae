//! Property-based tests for evaluator invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Purity: identical (transaction, rule set) inputs yield identical
//!   assessments
//! - Monotonicity: raising the amount never lowers the score
//! - The score stays within 0-100 and its band matches the thresholds
//! - Triggered rules correspond exactly to non-zero contributions

use proptest::prelude::*;
use risk_evaluator::{RiskEvaluator, RuleSet, Transaction};
use rust_decimal::Decimal;

/// Strategy for amounts in USD (1 to 200k)
fn amount_strategy() -> impl Strategy<Value = u64> {
    1u64..200_000
}

/// Strategy mixing classified countries with unknown ones
fn country_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("North Korea".to_string()),
        Just("Iran".to_string()),
        Just("Vietnam".to_string()),
        Just("India".to_string()),
        Just("Singapore".to_string()),
        Just("United States".to_string()),
        "[A-Z][a-z]{3,9}",
    ]
}

/// Strategy mixing classified purposes with unknown ones
fn purpose_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("investment".to_string()),
        Just("gambling".to_string()),
        Just("trade finance".to_string()),
        Just("remittance".to_string()),
        Just("payroll".to_string()),
        Just("services".to_string()),
        "[a-z]{4,10}",
    ]
}

/// Strategy for counterparty labels, including unmapped ones
fn counterparty_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("freelancer".to_string()),
        Just("smb".to_string()),
        Just("corporate".to_string()),
        Just("ngo".to_string()),
        Just("individual".to_string()),
    ]
}

fn history_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("multiple small transactions under $10k".to_string()),
    ]
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        amount_strategy(),
        country_strategy(),
        country_strategy(),
        purpose_strategy(),
        counterparty_strategy(),
        history_strategy(),
    )
        .prop_map(
            |(amount, source, destination, purpose, counterparty, history)| Transaction {
                amount: Decimal::from(amount),
                currency: "USD".to_string(),
                source_country: source,
                destination_country: destination,
                purpose,
                counterparty_type: counterparty,
                history_signals: history,
            },
        )
}

proptest! {
    /// Two evaluations of the same inputs agree on every field apart from
    /// the timestamp.
    #[test]
    fn evaluate_is_pure(tx in transaction_strategy()) {
        let evaluator = RiskEvaluator::default();
        let rules = RuleSet::default();

        let first = evaluator.evaluate(&tx, &rules).unwrap();
        let second = evaluator.evaluate(&tx, &rules).unwrap();

        prop_assert_eq!(first.risk_score, second.risk_score);
        prop_assert_eq!(first.risk_level, second.risk_level);
        prop_assert_eq!(first.triggered_rules, second.triggered_rules);
        prop_assert_eq!(first.rationale, second.rationale);
        prop_assert_eq!(first.checklist_items, second.checklist_items);
    }

    /// Raising the amount, all else equal, never lowers the score.
    #[test]
    fn score_is_monotone_in_amount(
        tx in transaction_strategy(),
        bump in 1u64..100_000,
    ) {
        let evaluator = RiskEvaluator::default();
        let rules = RuleSet::default();

        let lower = evaluator.evaluate(&tx, &rules).unwrap();

        let mut raised = tx.clone();
        raised.amount += Decimal::from(bump);
        let higher = evaluator.evaluate(&raised, &rules).unwrap();

        prop_assert!(higher.risk_score >= lower.risk_score);
    }

    /// The score is clamped to 0-100 and its band agrees with the rule
    /// set's thresholds.
    #[test]
    fn score_stays_in_band(tx in transaction_strategy()) {
        let evaluator = RiskEvaluator::default();
        let rules = RuleSet::default();

        let result = evaluator.evaluate(&tx, &rules).unwrap();
        let score = result.risk_score.score();

        prop_assert!(score <= 100);
        prop_assert_eq!(
            result.risk_level,
            rules.risk_score_thresholds.level_for(score)
        );
    }

    /// A zero score means nothing triggered, and a non-zero score means at
    /// least one rule is reported.
    #[test]
    fn triggered_rules_track_contributions(tx in transaction_strategy()) {
        let evaluator = RiskEvaluator::default();
        let result = evaluator.evaluate(&tx, &RuleSet::default()).unwrap();

        prop_assert_eq!(
            result.risk_score.score() == 0,
            result.triggered_rules.is_empty()
        );
    }
}
