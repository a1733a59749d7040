use std::path::PathBuf;

use tracing::info;

use crate::cli::args::{
    ConfigAction, ConfigArgs, GenerateArgs, GlobalOpts, InitArgs, OutputFormat, PrintArgs,
};
use crate::config::loader::{get_config_path, home_dir};
use crate::config::types::EcogenConfig;
use crate::descriptor::{
    assemble, ensure_data_dir, executable_dir, render, write_descriptor_set, AssemblyOptions,
    DescriptorSet, Environment, HostPaths,
};
use crate::error::{EcogenError, Result};
use crate::probe::{probe_sandbox, resolve_interpreter, Host, InterpreterPath, SandboxProbe};
use crate::settings::{read_settings, TunnelSettings};

/// Everything one run decided, before anything is written.
#[derive(Debug, Clone)]
pub struct Plan {
    pub interpreter: InterpreterPath,
    pub sandbox: SandboxProbe,
    pub settings: TunnelSettings,
    pub set: DescriptorSet,
}

/// Host layout from config overrides, then CLI overrides.
pub fn host_paths(opts: &GlobalOpts, config: &EcogenConfig) -> HostPaths {
    let mut paths_config = config.paths.clone();
    if opts.home.is_some() {
        paths_config.home = opts.home.clone();
    }
    if opts.project_dir.is_some() {
        paths_config.project_dir = opts.project_dir.clone();
    }
    HostPaths::from_config(&paths_config, home_dir, executable_dir)
}

/// Probe the host, read settings and assemble the descriptors.
///
/// Probing and settings run independently; none of their failures are fatal.
pub async fn plan(
    host: &dyn Host,
    config: &EcogenConfig,
    paths: &HostPaths,
    environment: Environment,
) -> Plan {
    let interpreter = resolve_interpreter(host, &config.probe);
    let sandbox = probe_sandbox(host, &config.probe);
    let settings = read_settings(&paths.settings_file).await;

    let options = AssemblyOptions {
        tunnel: config.tunnel.clone(),
        launcher_interpreter: config.probe.launcher_interpreter.clone(),
        environment,
    };
    let set = assemble(&interpreter, &sandbox, &settings, paths, &options);

    Plan {
        interpreter,
        sandbox,
        settings,
        set,
    }
}

// ============================================================================
// Generation Commands
// ============================================================================

/// Write the ecosystem file. Only the final write can fail the run.
pub async fn generate(
    host: &dyn Host,
    args: GenerateArgs,
    config: EcogenConfig,
    mut paths: HostPaths,
    format: OutputFormat,
) -> Result<PathBuf> {
    if let Some(settings) = args.settings {
        paths.settings_file = settings;
    }
    let output = args.output.unwrap_or_else(|| paths.output.clone());
    info!(output = %output.display(), "Generating ecosystem file");

    ensure_data_dir(&paths.data_dir).await;

    let plan = plan(host, &config, &paths, Environment::capture()).await;
    write_descriptor_set(&plan.set, &output).await?;

    match format {
        OutputFormat::Text => {
            println!("Wrote {}", output.display());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "output": output,
                    "processes": plan.set.names(),
                })
            );
        }
    }

    Ok(output)
}

/// Print the ecosystem file instead of writing it
pub async fn print(
    host: &dyn Host,
    args: PrintArgs,
    config: EcogenConfig,
    mut paths: HostPaths,
) -> Result<()> {
    if let Some(settings) = args.settings {
        paths.settings_file = settings;
    }

    let plan = plan(host, &config, &paths, Environment::capture()).await;
    print!("{}", render(&plan.set)?);
    Ok(())
}

/// Report probe results
pub async fn probe(
    host: &dyn Host,
    args: PrintArgs,
    config: EcogenConfig,
    mut paths: HostPaths,
    format: OutputFormat,
) -> Result<()> {
    if let Some(settings) = args.settings {
        paths.settings_file = settings;
    }

    // The environment snapshot only matters for the bot descriptor.
    let plan = plan(host, &config, &paths, Environment::default()).await;

    match format {
        OutputFormat::Text => {
            println!(
                "{:<12} {} ({})",
                "interpreter",
                plan.interpreter,
                plan.interpreter.source()
            );
            let launcher = plan
                .sandbox
                .launcher()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:<12} {}", "launcher", launcher);
            println!(
                "{:<12} {} (effective: {}, token length: {})",
                "tunnel",
                plan.settings.mode,
                plan.settings.effective_mode(),
                plan.settings.token.len()
            );
            println!("{:<12} {}", "settings", paths.settings_file.display());
            println!("{:<12} {}", "output", paths.output.display());
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "interpreter": plan.interpreter,
                "sandbox": plan.sandbox,
                "tunnel": {
                    "mode": plan.settings.mode,
                    "effective_mode": plan.settings.effective_mode(),
                    "token_length": plan.settings.token.len(),
                },
                "settings_file": paths.settings_file,
                "output": paths.output,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

// ============================================================================
// Config Commands
// ============================================================================

pub async fn init(args: InitArgs) -> Result<()> {
    let config_path = get_config_path();

    if config_path.exists() && !args.force {
        println!("Configuration already exists at: {}", config_path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    // Create parent directories if needed
    if let Some(parent) = config_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Write default configuration
    let default_config = EcogenConfig::default();
    let toml_str =
        toml::to_string_pretty(&default_config).map_err(|e| EcogenError::Config(e.to_string()))?;

    tokio::fs::write(&config_path, toml_str).await?;

    println!("Created configuration at: {}", config_path.display());
    println!("\nQuick start:");
    println!("  # See what the host provides");
    println!("  ecogen probe");
    println!();
    println!("  # Write ecosystem.config.json next to the bot");
    println!("  ecogen generate --project-dir ~/bot");
    println!();
    println!("  # Start everything");
    println!("  pm2 start ~/bot/ecosystem.config.json");

    Ok(())
}

pub async fn config(args: ConfigArgs, config: EcogenConfig) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let toml_str =
                toml::to_string_pretty(&config).map_err(|e| EcogenError::Config(e.to_string()))?;
            println!("{}", toml_str);
        }
        ConfigAction::Path => {
            println!("{}", get_config_path().display());
        }
    }
    Ok(())
}
