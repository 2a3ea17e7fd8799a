//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts driving nightly relabelling runs rely on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | Usage error (bad arguments; clap uses it too)       |
//! | 3    | Configuration missing, malformed or inconsistent    |
//! | 4    | Point file content could not be parsed              |
//! | 5    | File system error reading or writing                |
//! | 6    | Batch finished but at least one file failed         |

use pointfix_cli::batch::BatchError;
use pointfix_config::ConfigError;
use pointfix_io::PointIoError;
use pointfix_matcher::MatchError;

/// Success - every file was relabelled.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Settings file unreadable as TOML, invalid match section, folder not configured.
pub const EXIT_CONFIG: u8 = 3;

/// Wrong field count or non-numeric coordinate in a point file.
pub const EXIT_PARSE: u8 = 4;

/// Folder missing, file unreadable, output not writable.
pub const EXIT_IO: u8 = 5;

/// Some as-built files were written, others failed (see the report).
pub const EXIT_PARTIAL: u8 = 6;

pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Read { .. } | ConfigError::Write { .. } => EXIT_IO,
        ConfigError::Parse { .. } | ConfigError::Invalid(_) | ConfigError::MissingPath(_) => {
            EXIT_CONFIG
        }
    }
}

pub fn io_exit_code(err: &PointIoError) -> u8 {
    if err.is_parse() {
        EXIT_PARSE
    } else {
        EXIT_IO
    }
}

pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::ConfigParse(_) | MatchError::ConfigValidation(_) => EXIT_CONFIG,
        MatchError::InvalidCoordinate { .. } => EXIT_PARSE,
    }
}

pub fn batch_exit_code(err: &BatchError) -> u8 {
    match err {
        BatchError::Io(e) => io_exit_code(e),
        BatchError::Match(e) => match_exit_code(e),
        BatchError::OutputIsInput(_) => EXIT_USAGE,
    }
}
