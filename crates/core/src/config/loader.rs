//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Candidate file names searched in the working directory
pub const CONFIG_CANDIDATES: &[&str] = &[
    "fineer-build.toml",
    ".fineer-build.toml",
    "android/fineer-build.toml",
];

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or from the first candidate
    /// file found under `base_dir`.
    pub fn load(path: Option<&Path>, base_dir: &Path) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => find_config_file(base_dir)
                .ok_or_else(|| Error::config_not_found(base_dir.join(CONFIG_CANDIDATES[0])))?,
        };

        let schema = load_config_file(&config_path)?;
        tracing::debug!(path = %config_path.display(), "Loaded build configuration");

        Ok(Self {
            schema,
            path: Some(config_path),
        })
    }

    /// Parse configuration text without touching the filesystem
    pub fn parse(text: &str) -> Result<Self> {
        let schema = toml::from_str(text)?;
        Ok(Self { schema, path: None })
    }

    /// Directory the configuration was loaded from; relative paths in the
    /// schema are interpreted against it.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Find configuration file in standard locations
fn find_config_file(base_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base_dir.join(candidate))
        .find(|p| p.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str::<ConfigSchema>(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))
}
