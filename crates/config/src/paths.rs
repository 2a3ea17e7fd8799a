// Folder paths for a batch run

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The three folders a batch run works with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Folder holding the reference design point files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    /// Folder holding the as-built survey files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asbuilt_path: Option<PathBuf>,
    /// Folder receiving the relabelled files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl PathConfig {
    /// Fields set in `overrides` replace the ones in `self`.
    pub fn overlay(self, overrides: PathConfig) -> Self {
        Self {
            csv_path: overrides.csv_path.or(self.csv_path),
            asbuilt_path: overrides.asbuilt_path.or(self.asbuilt_path),
            output_path: overrides.output_path.or(self.output_path),
        }
    }

    pub fn csv(&self) -> Result<&Path, ConfigError> {
        self.csv_path.as_deref().ok_or(ConfigError::MissingPath("csv_path"))
    }

    pub fn asbuilt(&self) -> Result<&Path, ConfigError> {
        self.asbuilt_path.as_deref().ok_or(ConfigError::MissingPath("asbuilt_path"))
    }

    pub fn output(&self) -> Result<&Path, ConfigError> {
        self.output_path.as_deref().ok_or(ConfigError::MissingPath("output_path"))
    }
}
