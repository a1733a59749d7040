use std::collections::BTreeMap;

use tracing::debug;

use crate::config::TunnelConfig;
use crate::descriptor::{DescriptorSet, HostPaths, ProcessDescriptor};
use crate::probe::{InterpreterPath, SandboxProbe};
use crate::settings::{TunnelMode, TunnelSettings};

pub const FILE_SERVER: &str = "alist";
pub const DOWNLOAD_MANAGER: &str = "aria2";
pub const BOT: &str = "bot";
pub const TUNNEL: &str = "tunnel";

const DEFAULT_RESTART_DELAY_MS: u64 = 5000;
const BOT_RESTART_DELAY_MS: u64 = 3000;
const MAX_RESTARTS: u32 = 10;

/// Snapshot of environment variables, copied into the bot descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(BTreeMap<String, String>);

impl Environment {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn capture() -> Self {
        let mut vars = BTreeMap::new();
        let mut skipped = 0usize;
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    vars.insert(key, value);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "Skipped non UTF-8 environment entries");
        }
        Self(vars)
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Host-specific knobs that are not probe results.
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    pub tunnel: TunnelConfig,
    /// Interpreter PM2 runs the sandbox launcher with
    pub launcher_interpreter: String,
    pub environment: Environment,
}

/// cloudflared arguments for the effective tunnel mode.
pub fn tunnel_args(settings: &TunnelSettings, tunnel: &TunnelConfig) -> Vec<String> {
    let mut args: Vec<String> = match settings.effective_mode() {
        TunnelMode::Token => vec![
            "tunnel".into(),
            "run".into(),
            "--token".into(),
            settings.token.clone(),
        ],
        TunnelMode::Quick => vec![
            "tunnel".into(),
            "--url".into(),
            tunnel.origin_url(),
            "--no-autoupdate".into(),
        ],
    };

    args.extend([
        "--protocol".to_string(),
        tunnel.protocol.clone(),
        "--edge-ip-version".to_string(),
        tunnel.edge_ip_version.to_string(),
        "--metrics".to_string(),
        tunnel.metrics_addr.clone(),
    ]);
    args
}

/// Build the four process descriptors. Pure: same inputs, same output.
pub fn assemble(
    interpreter: &InterpreterPath,
    sandbox: &SandboxProbe,
    settings: &TunnelSettings,
    paths: &HostPaths,
    options: &AssemblyOptions,
) -> DescriptorSet {
    let mut file_server =
        ProcessDescriptor::native(FILE_SERVER, &paths.file_server_bin, DEFAULT_RESTART_DELAY_MS);
    file_server.args = vec![
        "server".to_string(),
        "--data".to_string(),
        paths.data_dir.display().to_string(),
    ];
    file_server.working_directory = Some(paths.data_dir.clone());
    file_server.max_restarts = Some(MAX_RESTARTS);

    let mut download_manager =
        ProcessDescriptor::native(DOWNLOAD_MANAGER, "aria2c", DEFAULT_RESTART_DELAY_MS);
    download_manager.args = vec![format!("--conf-path={}", paths.aria2_conf.display())];

    let mut bot = ProcessDescriptor::native(BOT, interpreter.as_path(), BOT_RESTART_DELAY_MS);
    bot.args = vec!["-u".to_string(), "-m".to_string(), "bot.main".to_string()];
    bot.working_directory = Some(paths.project_dir.clone());
    bot.env_overrides = options.environment.vars().clone();
    bot.env_overrides
        .insert("PYTHONUNBUFFERED".to_string(), "1".to_string());

    let mut tunnel =
        ProcessDescriptor::native(TUNNEL, &paths.tunnel_bin, DEFAULT_RESTART_DELAY_MS);
    tunnel.args = tunnel_args(settings, &options.tunnel);
    tunnel.max_restarts = Some(MAX_RESTARTS);
    // Go's cgo resolver fails on Android; force the pure Go one.
    tunnel
        .env_overrides
        .insert("GODEBUG".to_string(), "netdns=go".to_string());

    if let Some(launcher) = sandbox.launcher() {
        debug!(launcher = %launcher.display(), "Wrapping tunnel in sandbox launcher");
        tunnel.wrap_with(launcher, &options.launcher_interpreter);
    }

    DescriptorSet {
        processes: vec![file_server, download_manager, bot, tunnel],
    }
}
