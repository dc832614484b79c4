//! augment CLI
//!
//! Command-line front end for the audio-augment toolbox.

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::info;

use audio_augment::cli::{commands, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("audio-augment v{}", env!("CARGO_PKG_VERSION"));

    let summary = commands::run(&cli).context("augmentation run failed")?;
    if summary.failed > 0 {
        bail!(
            "{} of {} inputs failed",
            summary.failed,
            cli.command.inputs().len()
        );
    }
    Ok(())
}
