use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// On-disk state: the last location the user searched for. Restored at
/// startup so the app opens on the previous forecast.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub location: String,
}

impl Config {
    /// Load from the platform config file, or return an empty default if it
    /// doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// The TUI owns stdout, so tracing output goes to a file instead.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.cache_dir().join("omw.log"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "omw")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("omw-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_loads_default() {
        let cfg = Config::load_from(Path::new("/nonexistent/omw/config.toml")).unwrap();
        assert_eq!(cfg.location, "");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = temp_path("roundtrip.toml");
        let cfg = Config {
            location: "Berlin".to_string(),
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.location, "Berlin");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed.toml");
        fs::write(&path, "location = [not toml").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        let _ = fs::remove_file(&path);
    }
}
