use crate::config::{ThresholdConfig, DEFAULT_FIELD_MATCH_THRESHOLD, DEFAULT_PAIRING_THRESHOLD};
use crate::model::{
    FieldDifference, PairEvaluation, Record, Value, AMOUNT, DATE, DESCRIPTION, ID, REFERENCE,
};
use crate::similarity::similarity;

/// Fields compared first, in this order, when present on both sides.
pub const PRIORITY_FIELDS: [&str; 5] = [ID, REFERENCE, DATE, AMOUNT, DESCRIPTION];

/// Identifier fields that enable the structural pairing rule.
pub const KEY_FIELDS: [&str; 2] = [ID, REFERENCE];

/// Compare two records over every field present in both.
///
/// Priority fields come first in `matched_fields` / `differences`, followed by
/// the remaining shared fields in the left record's field order. Fields held
/// by only one side are ignored entirely.
pub fn evaluate_pair(left: &Record, right: &Record, field_threshold: f64) -> PairEvaluation {
    let mut matched_fields = Vec::new();
    let mut differences = Vec::new();
    let mut total_similarity = 0.0;
    let mut field_count = 0usize;

    let mut compare = |field: &str, value1: &Value, value2: &Value| {
        let score = similarity(value1, value2);
        total_similarity += score;
        field_count += 1;

        if score >= field_threshold {
            matched_fields.push(field.to_string());
        } else {
            differences.push(FieldDifference {
                field: field.to_string(),
                value1: value1.clone(),
                value2: value2.clone(),
            });
        }
    };

    for field in PRIORITY_FIELDS {
        if let (Some(value1), Some(value2)) = (left.get(field), right.get(field)) {
            compare(field, value1, value2);
        }
    }

    for (field, value1) in left.fields() {
        if PRIORITY_FIELDS.contains(&field) {
            continue;
        }
        if let Some(value2) = right.get(field) {
            compare(field, value1, value2);
        }
    }

    let confidence = if field_count > 0 {
        total_similarity / field_count as f64
    } else {
        0.0
    };

    PairEvaluation {
        confidence,
        matched_fields,
        differences,
    }
}

/// Whether an evaluated pair represents the same transaction.
///
/// Accepted on high confidence, or when a key field matched together with
/// at least one other field.
pub fn is_likely_same(evaluation: &PairEvaluation, pairing_threshold: f64) -> bool {
    let has_key_match = evaluation
        .matched_fields
        .iter()
        .any(|f| KEY_FIELDS.contains(&f.as_str()));
    let has_multiple_matches = evaluation.matched_fields.len() >= 2;

    evaluation.confidence >= pairing_threshold || (has_key_match && has_multiple_matches)
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Both thresholds bundled for repeated pair checks during one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingPolicy {
    pub field_match_threshold: f64,
    pub pairing_threshold: f64,
}

impl Default for PairingPolicy {
    fn default() -> Self {
        Self {
            field_match_threshold: DEFAULT_FIELD_MATCH_THRESHOLD,
            pairing_threshold: DEFAULT_PAIRING_THRESHOLD,
        }
    }
}

impl From<&ThresholdConfig> for PairingPolicy {
    fn from(t: &ThresholdConfig) -> Self {
        Self {
            field_match_threshold: t.field_match,
            pairing_threshold: t.pairing,
        }
    }
}

impl PairingPolicy {
    pub fn evaluate(&self, left: &Record, right: &Record) -> PairEvaluation {
        evaluate_pair(left, right, self.field_match_threshold)
    }

    pub fn accepts(&self, evaluation: &PairEvaluation) -> bool {
        is_likely_same(evaluation, self.pairing_threshold)
    }

    /// Evaluate and decide in one step.
    pub fn same_transaction(&self, left: &Record, right: &Record) -> bool {
        self.accepts(&self.evaluate(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[(&str, Value)]) -> Record {
        fields
            .iter()
            .fold(Record::new(), |r, (k, v)| r.with(*k, v.clone()))
    }

    #[test]
    fn identical_records() {
        let a = rec(&[
            ("id", "A1".into()),
            ("amount", 100.into()),
            ("date", "2024-01-01".into()),
        ]);
        let eval = evaluate_pair(&a, &a, 0.9);
        assert_eq!(eval.confidence, 1.0);
        assert_eq!(eval.matched_fields, vec!["id", "date", "amount"]);
        assert!(eval.differences.is_empty());
    }

    #[test]
    fn priority_fields_lead_in_priority_order() {
        let left = rec(&[
            ("memo", "x".into()),
            ("category", "fees".into()),
            ("description", "Coffee".into()),
            ("reference", "R-1".into()),
        ]);
        let right = rec(&[
            ("reference", "R-1".into()),
            ("memo", "y".into()),
            ("description", "Coffee".into()),
            ("category", "fees".into()),
        ]);
        let eval = evaluate_pair(&left, &right, 0.9);
        assert_eq!(eval.matched_fields, vec!["reference", "description", "category"]);
        assert_eq!(eval.differences.len(), 1);
        assert_eq!(eval.differences[0].field, "memo");
        assert_eq!(eval.differences[0].value1, Value::from("x"));
        assert_eq!(eval.differences[0].value2, Value::from("y"));
    }

    #[test]
    fn one_sided_fields_are_ignored() {
        let left = rec(&[("id", "A1".into()), ("memo", "only left".into())]);
        let right = rec(&[("id", "A1".into()), ("category", "only right".into())]);
        let eval = evaluate_pair(&left, &right, 0.9);
        assert_eq!(eval.compared_fields(), 1);
        assert_eq!(eval.confidence, 1.0);
    }

    #[test]
    fn no_shared_fields_scores_zero() {
        let left = rec(&[("id", "A1".into())]);
        let right = rec(&[("amount", 5.into())]);
        let eval = evaluate_pair(&left, &right, 0.9);
        assert_eq!(eval.confidence, 0.0);
        assert_eq!(eval.compared_fields(), 0);
        assert!(!is_likely_same(&eval, 0.8));
    }

    #[test]
    fn near_match_counts_toward_confidence_but_is_a_difference() {
        let left = rec(&[
            ("id", "A1".into()),
            ("amount", 100.into()),
            ("description", "Invoice".into()),
        ]);
        let right = rec(&[
            ("id", "A1".into()),
            ("amount", 100.into()),
            ("description", "Invoic".into()),
        ]);
        let eval = evaluate_pair(&left, &right, 0.9);
        let expected = (1.0 + 1.0 + 6.0 / 7.0) / 3.0;
        assert!((eval.confidence - expected).abs() < 1e-12);
        assert_eq!(eval.matched_fields, vec!["id", "amount"]);
        assert_eq!(eval.differences.len(), 1);
        assert_eq!(eval.differences[0].field, "description");
    }

    #[test]
    fn lower_field_threshold_accepts_near_match() {
        let left = rec(&[("description", "Invoice".into())]);
        let right = rec(&[("description", "Invoic".into())]);
        let eval = evaluate_pair(&left, &right, 0.8);
        assert_eq!(eval.matched_fields, vec!["description"]);
    }

    #[test]
    fn key_match_alone_is_not_enough() {
        let left = rec(&[("id", "A1".into()), ("amount", 100.into())]);
        let right = rec(&[("id", "A1".into()), ("amount", 105.into())]);
        let eval = evaluate_pair(&left, &right, 0.9);
        assert_eq!(eval.confidence, 0.5);
        assert!(!is_likely_same(&eval, 0.8));
    }

    #[test]
    fn key_match_plus_another_field_pairs_despite_low_confidence() {
        let left = rec(&[
            ("id", "A1".into()),
            ("date", "2024-01-01".into()),
            ("amount", 100.into()),
            ("description", "Rent".into()),
            ("category", "housing".into()),
        ]);
        let right = rec(&[
            ("id", "A1".into()),
            ("date", "2024-01-01".into()),
            ("amount", 120.into()),
            ("description", "Deposit".into()),
            ("category", "misc".into()),
        ]);
        let eval = evaluate_pair(&left, &right, 0.9);
        assert!(eval.confidence < 0.8);
        assert!(is_likely_same(&eval, 0.8));
    }

    #[test]
    fn high_confidence_pairs_without_key() {
        let left = rec(&[("date", "2024-01-01".into()), ("amount", 42.into())]);
        let right = rec(&[("date", "2024-01-01".into()), ("amount", 42.into())]);
        let policy = PairingPolicy::default();
        assert!(policy.same_transaction(&left, &right));
    }

    #[test]
    fn policy_from_thresholds() {
        let t = ThresholdConfig {
            field_match: 0.7,
            pairing: 0.6,
        };
        let policy = PairingPolicy::from(&t);
        assert_eq!(policy.field_match_threshold, 0.7);
        assert_eq!(policy.pairing_threshold, 0.6);
    }
}
