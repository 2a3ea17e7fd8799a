use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PointIoError {
    /// File or directory could not be read.
    Read { path: PathBuf, message: String },
    /// Output file could not be written.
    Write { path: PathBuf, message: String },
    /// Configured folder does not exist or is not a directory.
    NotADirectory(PathBuf),
    /// Record does not have the five positional point fields.
    MalformedRecord { path: PathBuf, line: u64, fields: usize },
    /// Coordinate or elevation is not a finite number.
    InvalidNumber {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl PointIoError {
    /// True for errors caused by file content rather than the file system.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. } | Self::InvalidNumber { .. })
    }
}

impl fmt::Display for PointIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
            Self::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
            Self::MalformedRecord { path, line, fields } => write!(
                f,
                "{}:{line}: expected 5 fields \
                 (name, easting, northing, elevation, code), found {fields}",
                path.display()
            ),
            Self::InvalidNumber { path, line, field, value } => {
                write!(f, "{}:{line}: {field} is not a number: '{value}'", path.display())
            }
        }
    }
}

impl std::error::Error for PointIoError {}
