//! eqsynth CLI - Five-band Equalizer
//!
//! Command-line interface for the eqsynth equalizer engine.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eqsynth::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("eqsynth v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("eqsynth v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Bands { json } => commands::list_bands(json).context("failed to list bands"),
        Commands::Process { input, output, eq } => {
            commands::process_file(&input, &output, eq.gains, eq.filter)
                .with_context(|| format!("failed to process {}", input.display()))
        }
        Commands::Response { sample_rate, eq } => {
            commands::print_response(sample_rate, eq.gains, eq.filter)
                .context("failed to evaluate frequency response")
        }
        Commands::Transfer {
            sample_rate,
            eq,
            latex,
        } => commands::print_transfer(sample_rate, eq.gains, eq.filter, latex)
            .context("failed to synthesize transfer function"),
    }
}
