#[cfg(test)]
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

/// The pieces of host state the probes depend on.
pub trait Host {
    /// Resolve a command name through the search path.
    fn lookup(&self, command: &str) -> Option<PathBuf>;

    /// Whether a filesystem path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The real host: PATH lookup via `which`, existence via the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn lookup(&self, command: &str) -> Option<PathBuf> {
        match which::which(command) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(command, error = %e, "Command not found on PATH");
                None
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory host for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticHost {
    commands: BTreeMap<String, PathBuf>,
    files: BTreeSet<PathBuf>,
}

#[cfg(test)]
impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.commands.insert(name.to_string(), path.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }
}

#[cfg(test)]
impl Host for StaticHost {
    fn lookup(&self, command: &str) -> Option<PathBuf> {
        self.commands.get(command).cloned()
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path) || self.commands.values().any(|p| p == path)
    }
}

/// One way of locating an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Search PATH for the command
    Lookup(String),
    /// Use this absolute path if it exists
    FixedPath(PathBuf),
}

impl Strategy {
    pub fn attempt(&self, host: &dyn Host) -> Option<PathBuf> {
        match self {
            Strategy::Lookup(command) => host.lookup(command),
            Strategy::FixedPath(path) => host.exists(path).then(|| path.clone()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Lookup(_) => "path-lookup",
            Strategy::FixedPath(_) => "fixed-path",
        }
    }
}

/// Try each strategy in order; the first one that yields a path wins.
pub fn resolve_first<'a>(
    host: &dyn Host,
    strategies: &'a [Strategy],
) -> Option<(PathBuf, &'a Strategy)> {
    strategies.iter().find_map(|strategy| {
        let found = strategy.attempt(host);
        debug!(strategy = strategy.label(), found = ?found, "Resolution attempt");
        found.map(|path| (path, strategy))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_success_wins() {
        let host = StaticHost::new()
            .with_command("python3", "/usr/bin/python3")
            .with_file("/opt/python3");
        let strategies = vec![
            Strategy::Lookup("python3".to_string()),
            Strategy::FixedPath(PathBuf::from("/opt/python3")),
        ];
        let (path, strategy) = resolve_first(&host, &strategies).unwrap();
        assert_eq!(path, PathBuf::from("/usr/bin/python3"));
        assert_eq!(strategy.label(), "path-lookup");
    }

    #[test]
    fn test_missing_fixed_path_is_skipped() {
        let host = StaticHost::new().with_command("python3", "/usr/local/bin/python3");
        let strategies = vec![
            Strategy::FixedPath(PathBuf::from("/opt/python3")),
            Strategy::Lookup("python3".to_string()),
        ];
        let (path, strategy) = resolve_first(&host, &strategies).unwrap();
        assert_eq!(path, PathBuf::from("/usr/local/bin/python3"));
        assert_eq!(*strategy, Strategy::Lookup("python3".to_string()));
    }

    #[test]
    fn test_no_strategy_succeeds() {
        let host = StaticHost::new();
        let strategies = vec![Strategy::Lookup("termux-chroot".to_string())];
        assert!(resolve_first(&host, &strategies).is_none());
    }
}
