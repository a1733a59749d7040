use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EcogenConfig {
    pub paths: PathsConfig,
    pub probe: ProbeConfig,
    pub tunnel: TunnelConfig,
}

/// Overrides for host locations. Unset values are derived at run time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Home directory (default: the current user's home)
    pub home: Option<PathBuf>,
    /// Directory holding the `bot` package (default: the executable's directory)
    pub project_dir: Option<PathBuf>,
    /// Output file (default: <project_dir>/ecosystem.config.json)
    pub output: Option<PathBuf>,
    /// Settings file (default: <home>/.env)
    pub settings_file: Option<PathBuf>,
}

/// How the interpreter and sandbox launcher are looked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Interpreter command searched on PATH
    pub interpreter: String,
    /// Absolute interpreter path tried when the PATH lookup fails
    pub interpreter_fallback: PathBuf,
    /// Sandbox launcher command searched on PATH
    pub sandbox_launcher: String,
    /// Interpreter PM2 uses to run the launcher script
    pub launcher_interpreter: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            interpreter_fallback: PathBuf::from("/data/data/com.termux/files/usr/bin/python3"),
            sandbox_launcher: "termux-chroot".to_string(),
            launcher_interpreter: "bash".to_string(),
        }
    }
}

/// Flags passed to cloudflared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// Host the quick tunnel forwards to (`127.0.0.1` or `localhost`)
    pub origin_host: String,
    /// Port of the file server
    pub origin_port: u16,
    /// Edge transport protocol
    pub protocol: String,
    /// IP version used to reach the edge
    pub edge_ip_version: u8,
    /// Local metrics listener
    pub metrics_addr: String,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            origin_host: "127.0.0.1".to_string(),
            origin_port: 5244,
            protocol: "http2".to_string(),
            edge_ip_version: 4,
            metrics_addr: "127.0.0.1:49500".to_string(),
        }
    }
}

impl TunnelConfig {
    pub fn origin_url(&self) -> String {
        format!("http://{}:{}", self.origin_host, self.origin_port)
    }
}
