use log::{debug, info};

use crate::config::ReconConfig;
use crate::evidence::compute_summary;
use crate::matcher::PairingPolicy;
use crate::model::{MatchResult, MismatchResult, PairEvaluation, Record, ReconResult};

/// Run reconciliation with default thresholds.
pub fn reconcile(left: &[Record], right: &[Record]) -> ReconResult {
    run(left, right, &ReconConfig::default())
}

/// Run reconciliation per config. Returns classified results + summary.
///
/// Greedy: each left record, in order, takes the accepted right candidate
/// with the highest confidence among those not yet consumed. Ties go to the
/// earliest right record. Results therefore depend on input order; this is
/// not an optimal assignment.
pub fn run(left: &[Record], right: &[Record], config: &ReconConfig) -> ReconResult {
    let policy = PairingPolicy::from(&config.thresholds);

    let mut left_used = vec![false; left.len()];
    let mut right_used = vec![false; right.len()];
    let mut matches = Vec::new();
    let mut mismatches = Vec::new();

    for (li, left_rec) in left.iter().enumerate() {
        if left_used[li] {
            continue;
        }

        let mut best: Option<(usize, PairEvaluation)> = None;

        for (ri, right_rec) in right.iter().enumerate() {
            if right_used[ri] {
                continue;
            }

            let evaluation = policy.evaluate(left_rec, right_rec);
            if !policy.accepts(&evaluation) {
                continue;
            }

            let better = match &best {
                None => true,
                Some((_, current)) => evaluation.confidence > current.confidence,
            };
            if better {
                best = Some((ri, evaluation));
            }
        }

        let Some((ri, evaluation)) = best else {
            debug!("left[{li}]: no candidate");
            continue;
        };

        left_used[li] = true;
        right_used[ri] = true;

        if evaluation.differences.is_empty() {
            debug!(
                "left[{li}] matched right[{ri}] (confidence {:.4})",
                evaluation.confidence
            );
            matches.push(MatchResult {
                record1: left_rec.clone(),
                record2: right[ri].clone(),
                confidence: evaluation.confidence,
                matched_fields: evaluation.matched_fields,
            });
        } else {
            debug!(
                "left[{li}] paired with right[{ri}] with {} difference(s) (confidence {:.4})",
                evaluation.differences.len(),
                evaluation.confidence
            );
            mismatches.push(MismatchResult {
                record1: left_rec.clone(),
                record2: right[ri].clone(),
                confidence: evaluation.confidence,
                differences: evaluation.differences,
            });
        }
    }

    let missing_in_dataset1 = unconsumed(right, &right_used);
    let missing_in_dataset2 = unconsumed(left, &left_used);

    let summary = compute_summary(
        left.len(),
        right.len(),
        matches.len(),
        mismatches.len(),
        missing_in_dataset1.len(),
        missing_in_dataset2.len(),
    );

    info!(
        "reconciled {} vs {} records: {} matched, {} mismatched, {} missing in dataset 1, {} missing in dataset 2 (match rate {:.2}%)",
        summary.total_records1,
        summary.total_records2,
        summary.total_matches,
        summary.total_mismatches,
        summary.total_missing_in1,
        summary.total_missing_in2,
        summary.match_rate,
    );

    ReconResult {
        matches,
        mismatches,
        missing_in_dataset1,
        missing_in_dataset2,
        summary,
    }
}

fn unconsumed(records: &[Record], used: &[bool]) -> Vec<Record> {
    records
        .iter()
        .zip(used)
        .filter(|(_, used)| !**used)
        .map(|(r, _)| r.clone())
        .collect()
}
