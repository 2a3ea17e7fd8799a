//! `pointfix-matcher`: spatial association of as-built points to reference points.
//!
//! Pure engine crate: receives pre-loaded points, returns joined records.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod summary;

pub use config::{MatchConfig, MatchStrategy, COINCIDENCE_EPSILON};
pub use engine::run;
pub use error::MatchError;
pub use index::ReferenceSet;
pub use model::{JoinedRecord, MatchResult, MatchSummary, MatchedReference};
