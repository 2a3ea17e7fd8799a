use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad radius, radius on the wrong strategy).
    ConfigValidation(String),
    /// A reference point cannot be indexed because its position is not finite.
    InvalidCoordinate { index: usize, name: String },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "match config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "match config validation error: {msg}"),
            Self::InvalidCoordinate { index, name } => {
                write!(f, "reference point #{index} '{name}': easting/northing must be finite")
            }
        }
    }
}

impl std::error::Error for MatchError {}
