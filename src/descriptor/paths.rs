use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::PathsConfig;

/// Name of the generated PM2 file.
pub const OUTPUT_FILE_NAME: &str = "ecosystem.config.json";

/// Fixed host locations the descriptors point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub home: PathBuf,
    /// Directory containing the `bot` package; also where the output lands by default
    pub project_dir: PathBuf,
    pub data_dir: PathBuf,
    pub file_server_bin: PathBuf,
    pub tunnel_bin: PathBuf,
    pub aria2_conf: PathBuf,
    pub settings_file: PathBuf,
    pub output: PathBuf,
}

impl HostPaths {
    /// Layout derived from a home directory and a project directory.
    pub fn new(home: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let project_dir = project_dir.into();
        Self {
            data_dir: home.join("alist-data"),
            file_server_bin: home.join("bin").join("alist"),
            tunnel_bin: home.join("bin").join("cloudflared"),
            aria2_conf: home.join(".aria2").join("aria2.conf"),
            settings_file: home.join(".env"),
            output: project_dir.join(OUTPUT_FILE_NAME),
            home,
            project_dir,
        }
    }

    /// Apply configured overrides on top of the derived layout.
    pub fn from_config(
        config: &PathsConfig,
        default_home: impl FnOnce() -> PathBuf,
        default_project_dir: impl FnOnce() -> PathBuf,
    ) -> Self {
        let home = config.home.clone().unwrap_or_else(default_home);
        let project_dir = config.project_dir.clone().unwrap_or_else(default_project_dir);
        let mut paths = Self::new(home, project_dir);
        if let Some(ref output) = config.output {
            paths.output = output.clone();
        }
        if let Some(ref settings) = config.settings_file {
            paths.settings_file = settings.clone();
        }
        paths
    }
}

/// Directory holding the running executable, else the current directory.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Create the file server's data directory. Failure is logged, not fatal.
pub async fn ensure_data_dir(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }
    match tokio::fs::create_dir_all(path).await {
        Ok(()) => {
            info!(path = %path.display(), "Created data directory");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to create data directory");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = HostPaths::new("/home/u", "/srv/bot");
        assert_eq!(paths.data_dir, PathBuf::from("/home/u/alist-data"));
        assert_eq!(paths.file_server_bin, PathBuf::from("/home/u/bin/alist"));
        assert_eq!(paths.tunnel_bin, PathBuf::from("/home/u/bin/cloudflared"));
        assert_eq!(paths.aria2_conf, PathBuf::from("/home/u/.aria2/aria2.conf"));
        assert_eq!(paths.settings_file, PathBuf::from("/home/u/.env"));
        assert_eq!(
            paths.output,
            PathBuf::from("/srv/bot/ecosystem.config.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = PathsConfig {
            home: Some(PathBuf::from("/h")),
            project_dir: None,
            output: Some(PathBuf::from("/tmp/out.json")),
            settings_file: None,
        };
        let paths = HostPaths::from_config(
            &config,
            || PathBuf::from("/unused"),
            || PathBuf::from("/p"),
        );
        assert_eq!(paths.home, PathBuf::from("/h"));
        assert_eq!(paths.project_dir, PathBuf::from("/p"));
        assert_eq!(paths.output, PathBuf::from("/tmp/out.json"));
        assert_eq!(paths.settings_file, PathBuf::from("/h/.env"));
    }

    #[tokio::test]
    async fn test_ensure_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("a").join("alist-data");
        assert!(ensure_data_dir(&data).await);
        assert!(data.is_dir());
        assert!(ensure_data_dir(&data).await);
    }

    #[tokio::test]
    async fn test_ensure_data_dir_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(!ensure_data_dir(&file.join("alist-data")).await);
    }
}
