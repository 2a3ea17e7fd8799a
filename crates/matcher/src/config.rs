use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Distance below which two positions count as the same location.
///
/// Absorbs floating-point noise only; it is not a search radius.
pub const COINCIDENCE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Only a reference point at the same location is a match.
    Coincident,
    /// The closest reference point is a match, optionally bounded by
    /// `tolerance.max_distance`.
    Nearest,
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::Coincident
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coincident => write!(f, "coincident"),
            Self::Nearest => write!(f, "nearest"),
        }
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coincident" => Ok(Self::Coincident),
            "nearest" => Ok(Self::Nearest),
            other => Err(MatchError::ConfigValidation(format!(
                "unknown strategy \"{other}\" (expected \"coincident\" or \"nearest\")"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    /// Search radius in CRS units. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn coincident() -> Self {
        Self::default()
    }

    pub fn nearest(max_distance: Option<f64>) -> Self {
        Self {
            strategy: MatchStrategy::Nearest,
            tolerance: ToleranceConfig { max_distance },
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let Some(max) = self.tolerance.max_distance else {
            return Ok(());
        };

        if self.strategy == MatchStrategy::Coincident {
            return Err(MatchError::ConfigValidation(
                "max_distance requires strategy = \"nearest\"".into(),
            ));
        }

        if !max.is_finite() || max < 0.0 {
            return Err(MatchError::ConfigValidation(format!(
                "max_distance must be a finite, non-negative distance, got {max}"
            )));
        }

        Ok(())
    }

    /// Radius handed to the index query: the coincidence epsilon, the
    /// configured tolerance, or `None` for an unbounded nearest search.
    pub fn search_radius(&self) -> Option<f64> {
        match self.strategy {
            MatchStrategy::Coincident => Some(COINCIDENCE_EPSILON),
            MatchStrategy::Nearest => self.tolerance.max_distance,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
