use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    Write { path: PathBuf, message: String },
    /// Settings parsed but are inconsistent (bad match config, empty extension).
    Invalid(String),
    /// A folder the run needs was never configured.
    MissingPath(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read config {}: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
            Self::Write { path, message } => {
                write!(f, "cannot write config {}: {message}", path.display())
            }
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
            Self::MissingPath(name) => write!(f, "{name} is not configured"),
        }
    }
}

impl std::error::Error for ConfigError {}
