use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::types::EcogenConfig;
use crate::error::{EcogenError, Result};

/// Get the default configuration file path
pub fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "ecogen", "ecogen") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        // Fallback to home directory
        home_dir().join(".ecogen").join("config.toml")
    }
}

/// The current user's home directory, or `.` when it cannot be determined.
pub fn home_dir() -> PathBuf {
    if let Some(base) = directories::BaseDirs::new() {
        return base.home_dir().to_path_buf();
    }
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load configuration from file, with defaults for missing values.
///
/// An explicitly requested file must exist and parse. A broken file at the
/// default location only produces a warning.
pub fn load_config(config_path: Option<&Path>) -> Result<EcogenConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(EcogenError::ConfigNotFound {
                    path: path.display().to_string(),
                });
            }
            parse_config_file(path)
        }
        None => Ok(load_default_config(&get_config_path())),
    }
}

/// Load the config at the default location, falling back to defaults.
pub fn load_default_config(path: &Path) -> EcogenConfig {
    if !path.exists() {
        // Return defaults if no config file exists
        return EcogenConfig::default();
    }
    match parse_config_file(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unusable config file, using defaults");
            EcogenConfig::default()
        }
    }
}

fn parse_config_file(path: &Path) -> Result<EcogenConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EcogenConfig =
        toml::from_str(&content).map_err(|e| EcogenError::TomlParse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, EcogenError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tunnel\norigin_port = ").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, EcogenError::TomlParse(_)));
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[probe]\nsandbox_launcher = \"proot\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.probe.sandbox_launcher, "proot");
        assert_eq!(config.tunnel.metrics_addr, "127.0.0.1:49500");
    }

    #[test]
    fn test_malformed_default_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecogen").join("config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[tunnel\norigin_port = ").unwrap();

        let config = load_default_config(&path);
        assert_eq!(config.tunnel.origin_port, 5244);
        assert_eq!(config.probe.interpreter, "python3");
    }

    #[test]
    fn test_valid_default_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tunnel]\norigin_host = \"localhost\"\n").unwrap();
        assert_eq!(load_default_config(&path).tunnel.origin_host, "localhost");
        assert_eq!(
            load_default_config(&dir.path().join("absent.toml")).tunnel.origin_host,
            "127.0.0.1"
        );
    }
}
