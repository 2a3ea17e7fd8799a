use pointfix_core::Point;

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::index::ReferenceSet;
use crate::matcher::match_points;
use crate::model::{MatchMeta, MatchResult};
use crate::summary::compute_summary;

/// Match one as-built sequence per config. Returns joined records + summary.
pub fn run(
    config: &MatchConfig,
    as_built: &[Point],
    reference: &ReferenceSet,
) -> Result<MatchResult, MatchError> {
    config.validate()?;

    let records = match_points(as_built, reference, config);
    let summary = compute_summary(&records);

    for r in records.iter().filter(|r| r.is_ambiguous()) {
        if let Some(m) = &r.reference {
            log::warn!(
                "row {} '{}': {} other reference point(s) equally close to '{}'; kept first loaded",
                r.row + 1,
                r.asbuilt_name,
                m.ties,
                m.point.name,
            );
        }
    }

    log::debug!(
        "{} strategy: {} rows, {} matched, {} unmatched",
        config.strategy,
        summary.total,
        summary.matched,
        summary.unmatched,
    );

    Ok(MatchResult {
        meta: MatchMeta {
            strategy: config.strategy,
            search_radius: config.search_radius(),
            reference_points: reference.len(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        summary,
        records,
    })
}
