use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::ProbeConfig;
use crate::probe::host::{resolve_first, Host, Strategy};

/// Resolved Python interpreter for the bot process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpreterPath {
    path: PathBuf,
    /// Which strategy produced the path
    source: &'static str,
}

impl InterpreterPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: "explicit",
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &'static str {
        self.source
    }
}

impl fmt::Display for InterpreterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// PATH lookup, then the Termux install location.
pub fn interpreter_strategies(config: &ProbeConfig) -> Vec<Strategy> {
    vec![
        Strategy::Lookup(config.interpreter.clone()),
        Strategy::FixedPath(config.interpreter_fallback.clone()),
    ]
}

/// Resolve the interpreter. Always returns a usable command: when every
/// strategy misses, the bare command name is left for PM2 to find on PATH.
pub fn resolve_interpreter(host: &dyn Host, config: &ProbeConfig) -> InterpreterPath {
    let strategies = interpreter_strategies(config);
    let resolved = resolve_first(host, &strategies)
        .map(|(path, strategy)| InterpreterPath {
            path,
            source: strategy.label(),
        })
        .unwrap_or_else(|| InterpreterPath {
            path: PathBuf::from(&config.interpreter),
            source: "bare-name",
        });

    info!(path = %resolved, source = resolved.source, "Python interpreter");
    resolved
}
