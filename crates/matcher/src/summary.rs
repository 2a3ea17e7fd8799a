use crate::model::{JoinedRecord, MatchSummary};

/// Compute summary statistics from joined records.
pub fn compute_summary(records: &[JoinedRecord]) -> MatchSummary {
    let mut matched = 0;
    let mut ambiguous = 0;

    for r in records {
        if r.is_matched() {
            matched += 1;
        }
        if r.is_ambiguous() {
            ambiguous += 1;
        }
    }

    MatchSummary {
        total: records.len(),
        matched,
        unmatched: records.len() - matched,
        ambiguous,
    }
}
