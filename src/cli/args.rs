use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "ecogen")]
#[clap(version, about = "Generate a PM2 ecosystem file for alist, aria2, the bot and cloudflared")]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub global_opts: GlobalOpts,

    /// Defaults to `generate`
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path
    #[clap(short, long, global = true, env = "ECOGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[clap(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Home directory holding bin/, .env and alist-data/
    #[clap(long, global = true)]
    pub home: Option<PathBuf>,

    /// Directory containing the bot package
    ///
    /// Defaults to the directory of the ecogen executable. Pass this when the
    /// binary lives elsewhere (e.g. ~/.cargo/bin after `cargo install`), or the
    /// bot's working directory will not contain `bot/`.
    #[clap(long, global = true)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the host and write the ecosystem file
    Generate(GenerateArgs),

    /// Probe the host and print the ecosystem file without writing it
    Print(PrintArgs),

    /// Show what the probes found
    Probe(PrintArgs),

    /// Initialize a new ecogen configuration
    Init(InitArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Where to write the ecosystem file
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Settings file with TUNNEL_MODE / CLOUDFLARE_TOKEN
    #[clap(long, short = 's')]
    pub settings: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct PrintArgs {
    /// Settings file with TUNNEL_MODE / CLOUDFLARE_TOKEN
    #[clap(long, short = 's')]
    pub settings: Option<PathBuf>,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[clap(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
}

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
