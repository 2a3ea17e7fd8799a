// Configuration loading

pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::PathConfig;
pub use settings::{FileConventions, Settings};
