use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ProbeConfig;
use crate::probe::host::Host;

/// Whether a sandbox launcher (e.g. `termux-chroot`) is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SandboxProbe {
    sandboxed: bool,
    launcher: Option<PathBuf>,
}

impl SandboxProbe {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn detected(launcher: impl Into<PathBuf>) -> Self {
        Self {
            sandboxed: true,
            launcher: Some(launcher.into()),
        }
    }

    pub fn is_sandboxed(&self) -> bool {
        self.sandboxed
    }

    /// Launcher path, present exactly when sandboxed.
    pub fn launcher(&self) -> Option<&Path> {
        self.launcher.as_deref()
    }
}

/// Look the launcher up on PATH. Most hosts lack it; that is not an error.
pub fn probe_sandbox(host: &dyn Host, config: &ProbeConfig) -> SandboxProbe {
    match host.lookup(&config.sandbox_launcher) {
        Some(path) => {
            info!(launcher = %path.display(), "Sandbox launcher found, tunnel will be wrapped");
            SandboxProbe::detected(path)
        }
        None => {
            debug!(launcher = %config.sandbox_launcher, "No sandbox launcher");
            SandboxProbe::absent()
        }
    }
}
