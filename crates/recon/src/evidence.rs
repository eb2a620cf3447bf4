use crate::model::ReconSummary;

/// Compute summary statistics for one run.
///
/// `match_rate` is matches as a percentage of the left collection, rounded to
/// two decimal places, and 0 when the left collection is empty.
pub fn compute_summary(
    total_records1: usize,
    total_records2: usize,
    total_matches: usize,
    total_mismatches: usize,
    total_missing_in1: usize,
    total_missing_in2: usize,
) -> ReconSummary {
    let match_rate = if total_records1 > 0 {
        round2(total_matches as f64 / total_records1 as f64 * 100.0)
    } else {
        0.0
    };

    ReconSummary {
        total_records1,
        total_records2,
        total_matches,
        total_mismatches,
        total_missing_in1,
        total_missing_in2,
        match_rate,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts() {
        let summary = compute_summary(5, 4, 2, 1, 1, 2);
        assert_eq!(summary.total_records1, 5);
        assert_eq!(summary.total_records2, 4);
        assert_eq!(summary.total_matches, 2);
        assert_eq!(summary.total_mismatches, 1);
        assert_eq!(summary.total_missing_in1, 1);
        assert_eq!(summary.total_missing_in2, 2);
        assert_eq!(summary.match_rate, 40.0);
        assert!(!summary.is_reconciled());
    }

    #[test]
    fn match_rate_rounds_to_two_places() {
        assert_eq!(compute_summary(3, 3, 2, 0, 1, 1).match_rate, 66.67);
        assert_eq!(compute_summary(3, 3, 1, 0, 2, 2).match_rate, 33.33);
        assert_eq!(compute_summary(7, 7, 7, 0, 0, 0).match_rate, 100.0);
    }

    #[test]
    fn empty_left_has_zero_rate() {
        let summary = compute_summary(0, 3, 0, 0, 3, 0);
        assert_eq!(summary.match_rate, 0.0);
    }

    #[test]
    fn fully_reconciled() {
        assert!(compute_summary(2, 2, 2, 0, 0, 0).is_reconciled());
    }
}
