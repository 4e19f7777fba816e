//! Inspect and create the settings file.

use clap::{Args, Subcommand};
use makestereo_config::{Settings, ensure_user_config_dir, settings_path};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the settings file location
    Path,

    /// Print the effective settings as TOML (default)
    Show,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Path => {
            println!("{}", settings_path().display());
        }
        ConfigCommand::Show => {
            print!("{}", settings.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            let path = settings_path();
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ensure_user_config_dir()?;
            Settings::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
