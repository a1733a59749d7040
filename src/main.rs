use clap::Parser;

use ecogen::cli::args::{Cli, Commands, GenerateArgs};
use ecogen::cli::commands;
use ecogen::config::loader::load_config;
use ecogen::error::Result;
use ecogen::probe::SystemHost;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.global_opts.verbose);

    // Load configuration (file + CLI overrides)
    let config = load_config(cli.global_opts.config.as_deref())?;
    let paths = commands::host_paths(&cli.global_opts, &config);
    let format = cli.global_opts.format.clone();
    let host = SystemHost;

    // Dispatch to subcommand handler
    match cli.command.unwrap_or_else(|| Commands::Generate(GenerateArgs::default())) {
        Commands::Generate(args) => {
            if let Err(e) = commands::generate(&host, args, config, paths, format).await {
                if e.is_output_failure() {
                    tracing::error!(error = %e, "Ecosystem file was not written");
                }
                return Err(e);
            }
        }
        Commands::Print(args) => {
            commands::print(&host, args, config, paths).await?;
        }
        Commands::Probe(args) => {
            commands::probe(&host, args, config, paths, format).await?;
        }
        Commands::Init(args) => {
            commands::init(args).await?;
        }
        Commands::Config(args) => {
            commands::config(args, config).await?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
