use crate::catalog::Catalog;
use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Minimum module quiz score (percent) that marks a module complete.
    #[serde(default = "default_quiz_pass")]
    pub quiz_pass_percent: u32,
    /// Minimum role exam score (percent) that sets the exam-passed flag.
    #[serde(default = "default_exam_pass")]
    pub exam_pass_percent: u32,
    /// Replacement content catalog, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

fn default_quiz_pass() -> u32 {
    80
}

fn default_exam_pass() -> u32 {
    80
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            quiz_pass_percent: default_quiz_pass(),
            exam_pass_percent: default_exam_pass(),
            catalog_path: None,
        }
    }
}

impl Config {
    /// Load `.academy/config.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    /// Write the default config unless one exists. Returns true if written.
    pub fn write_default(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Self::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    /// The catalog this config points at, or the built-in one.
    pub fn catalog(&self, root: &Path) -> Result<Catalog> {
        match &self.catalog_path {
            Some(p) => Catalog::load(&root.join(p)),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        for (name, value) in [
            ("quiz_pass_percent", self.quiz_pass_percent),
            ("exam_pass_percent", self.exam_pass_percent),
        ] {
            if value == 0 || value > 100 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name} must be between 1 and 100, got {value}"),
                });
            } else if value < 50 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{name} is {value}; learners can pass by guessing"),
                });
            }
        }
        if let Some(p) = &self.catalog_path {
            if let Err(e) = Catalog::load(&root.join(p)) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("catalog '{}' is unusable: {e}", p.display()),
                });
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.quiz_pass_percent, 80);
        assert_eq!(config.exam_pass_percent, 80);
        assert!(config.catalog_path.is_none());
        assert!(config.validate(dir.path()).is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".academy")).unwrap();
        std::fs::write(
            dir.path().join(".academy/config.yaml"),
            "quiz_pass_percent: 70\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.quiz_pass_percent, 70);
        assert_eq!(config.exam_pass_percent, 80);
    }

    #[test]
    fn save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            exam_pass_percent: 90,
            ..Config::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().exam_pass_percent, 90);
    }

    #[test]
    fn write_default_is_idempotent() {
        let dir = TempDir::new().unwrap();
        assert!(Config::write_default(dir.path()).unwrap());
        assert!(!Config::write_default(dir.path()).unwrap());
        assert_eq!(Config::load(dir.path()).unwrap().quiz_pass_percent, 80);
    }

    #[test]
    fn validate_flags_out_of_range_thresholds() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            quiz_pass_percent: 0,
            exam_pass_percent: 30,
            ..Config::default()
        };
        let warnings = config.validate(dir.path());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert_eq!(warnings[1].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_flags_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            catalog_path: Some(PathBuf::from("content/catalog.yaml")),
            ..Config::default()
        };
        let warnings = config.validate(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("content/catalog.yaml"));
        assert!(config.catalog(dir.path()).is_err());
    }
}
