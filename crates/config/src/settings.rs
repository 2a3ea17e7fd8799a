// Application settings
// Loaded from ~/.config/pointfix/config.toml

use std::fs;
use std::path::{Path, PathBuf};

use pointfix_matcher::MatchConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::PathConfig;

/// Irish Transverse Mercator, the CRS the survey data is delivered in.
pub const DEFAULT_CRS: &str = "EPSG:2157";

/// File extensions used for discovery and output naming (without the dot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConventions {
    pub reference_extension: String,
    pub asbuilt_extension: String,
    pub output_extension: String,
}

impl Default for FileConventions {
    fn default() -> Self {
        Self {
            reference_extension: "csv".into(),
            asbuilt_extension: "pts".into(),
            output_extension: "pts".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Identifier of the shared projected CRS. Informational: inputs are
    /// trusted to be in it already.
    pub crs: String,

    pub paths: PathConfig,

    pub files: FileConventions,

    #[serde(rename = "match")]
    pub matching: MatchConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crs: DEFAULT_CRS.into(),
            paths: PathConfig::default(),
            files: FileConventions::default(),
            matching: MatchConfig::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pointfix")
            .join("config.toml")
    }

    pub fn from_toml(input: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for (name, ext) in [
            ("files.reference_extension", &self.files.reference_extension),
            ("files.asbuilt_extension", &self.files.asbuilt_extension),
            ("files.output_extension", &self.files.output_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') || ext.contains(|c| c == '/' || c == '\\') {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a bare extension like \"pts\", got {ext:?}"
                )));
            }
        }

        Ok(())
    }

    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist yet. A file that exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents, path)
    }

    /// Save settings to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let text = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, text).map_err(|e| write_err(e.to_string()))?;
        log::debug!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointfix_matcher::MatchStrategy;
    use tempfile::tempdir;

    const FULL: &str = r#"
crs = "EPSG:2157"

[paths]
csv_path = "/data/design"
asbuilt_path = "/data/asbuilt"
output_path = "/data/fixed"

[files]
reference_extension = "csv"
asbuilt_extension = "txt"
output_extension = "pts"

[match]
strategy = "nearest"

[match.tolerance]
max_distance = 0.02
"#;

    #[test]
    fn parse_full() {
        let s = Settings::from_toml(FULL, Path::new("config.toml")).unwrap();
        assert_eq!(s.paths.csv_path, Some(PathBuf::from("/data/design")));
        assert_eq!(s.paths.asbuilt_path, Some(PathBuf::from("/data/asbuilt")));
        assert_eq!(s.paths.output_path, Some(PathBuf::from("/data/fixed")));
        assert_eq!(s.files.asbuilt_extension, "txt");
        assert_eq!(s.matching.strategy, MatchStrategy::Nearest);
        assert_eq!(s.matching.tolerance.max_distance, Some(0.02));
    }

    #[test]
    fn parse_empty_gives_defaults() {
        let s = Settings::from_toml("", Path::new("config.toml")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.crs, DEFAULT_CRS);
        assert_eq!(s.files.reference_extension, "csv");
        assert_eq!(s.files.asbuilt_extension, "pts");
        assert_eq!(s.matching.strategy, MatchStrategy::Coincident);
    }

    #[test]
    fn reject_invalid_match_section() {
        let input = r#"
[match]
strategy = "coincident"
[match.tolerance]
max_distance = 1.0
"#;
        let err = Settings::from_toml(input, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_dotted_extension() {
        let input = "[files]\nasbuilt_extension = \".pts\"\n";
        let err = Settings::from_toml(input, Path::new("config.toml")).unwrap_err();
        assert!(err.to_string().contains("files.asbuilt_extension"));
    }

    #[test]
    fn reject_malformed_toml() {
        let err = Settings::from_toml("[paths\ncsv_path = 1", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let s = Settings::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut s = Settings::default();
        s.paths.csv_path = Some("/design".into());
        s.paths.output_path = Some("/out".into());
        s.matching = MatchConfig::nearest(Some(0.01));
        s.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, s);
        assert!(loaded.paths.asbuilt_path.is_none());
    }
}
