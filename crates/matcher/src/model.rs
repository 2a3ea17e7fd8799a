use pointfix_core::Point;
use serde::Serialize;

use crate::config::MatchStrategy;

// ---------------------------------------------------------------------------
// Joined records
// ---------------------------------------------------------------------------

/// The reference point selected for one as-built row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedReference {
    /// Position of the point in the loaded reference sequence.
    pub index: usize,
    pub point: Point,
    /// Planar distance between the as-built position and the reference point.
    pub distance: f64,
    /// Other reference points that were exactly as close.
    pub ties: usize,
}

/// One as-built row after the left join.
///
/// Only the as-built name survives for reporting; its coordinates were the
/// query key and are not carried forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    /// Zero-based row in the as-built input.
    pub row: usize,
    pub asbuilt_name: String,
    pub reference: Option<MatchedReference>,
}

impl JoinedRecord {
    pub fn unmatched(row: usize, asbuilt_name: impl Into<String>) -> Self {
        Self {
            row,
            asbuilt_name: asbuilt_name.into(),
            reference: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.reference.is_some()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.reference.as_ref().is_some_and(|r| r.ties > 0)
    }

    /// The matched reference point, whose fields replace the as-built ones.
    pub fn point(&self) -> Option<&Point> {
        self.reference.as_ref().map(|r| &r.point)
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Matched rows where several reference points were equally close.
    pub ambiguous: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub strategy: MatchStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_radius: Option<f64>,
    pub reference_points: usize,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub records: Vec<JoinedRecord>,
}
