//! makestereo CLI - split stereo files into mono halves and merge mono pairs.

mod commands;
mod reporter;

use clap::{Parser, Subcommand};
use makestereo_config::Settings;
use makestereo_core::Mode;

#[derive(Parser)]
#[command(name = "makestereo")]
#[command(author, version, about = "Convert between stereo and dual-mono audio files", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split stereo files into left and right mono files
    Split(commands::convert::ConvertArgs),

    /// Merge left/right mono pairs into stereo files
    Merge(commands::convert::ConvertArgs),

    /// Show which files a run would use
    Analyze(commands::analyze::AnalyzeArgs),

    /// Display audio file metadata
    Info(commands::info::InfoArgs),

    /// Show or create the settings file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A broken settings file must not block `config init`.
    let settings = match Settings::load_or_default() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("warning: ignoring settings file: {e}");
            Settings::default()
        }
    };
    init_tracing(cli.verbose, settings.log_filter.as_deref());
    tracing::debug!(?settings, "loaded settings");

    match cli.command {
        Commands::Split(args) => commands::convert::run(Mode::SplitToMono, args, &settings),
        Commands::Merge(args) => commands::convert::run(Mode::MergeToStereo, args, &settings),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args, &settings),
    }
}

fn init_tracing(verbose: bool, configured: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
}
