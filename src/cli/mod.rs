//! CLI Module
//!
//! Command-line interface for the eqsynth equalizer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dsp::FilterKind;

/// eqsynth - five-band equalizer with IIR/FIR synthesis and transfer functions
#[derive(Parser, Debug)]
#[command(name = "eqsynth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Gain and filter selection shared by the synthesis commands
#[derive(clap::Args, Debug, Clone)]
pub struct EqArgs {
    /// Gains in dB for Sub, Bass, Mid, Presence, Brilliance (comma separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "0,0,0,0,0"
    )]
    pub gains: Vec<f64>,

    /// Filter family: iir or fir
    #[arg(short, long, default_value = "iir")]
    pub filter: FilterKind,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the equalizer bands
    #[command(name = "bands")]
    Bands {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Equalize a WAV file
    #[command(name = "process")]
    Process {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (16-bit PCM)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        eq: EqArgs,
    },

    /// Print the magnitude response as JSON
    #[command(name = "response")]
    Response {
        /// Sample rate in Hz
        #[arg(short, long, default_value_t = 44100)]
        sample_rate: u32,

        #[command(flatten)]
        eq: EqArgs,
    },

    /// Print the transfer function H(z)
    #[command(name = "transfer")]
    Transfer {
        /// Sample rate in Hz
        #[arg(short, long, default_value_t = 44100)]
        sample_rate: u32,

        #[command(flatten)]
        eq: EqArgs,

        /// Print LaTeX instead of plain text
        #[arg(long)]
        latex: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process() {
        let cli = Cli::parse_from([
            "eqsynth", "process", "in.wav", "-o", "out.wav", "--gains", "-3,0,2.5,0,6", "--filter",
            "FIR",
        ]);
        match cli.command {
            Some(Commands::Process { input, output, eq }) => {
                assert_eq!(input, PathBuf::from("in.wav"));
                assert_eq!(output, PathBuf::from("out.wav"));
                assert_eq!(eq.gains, vec![-3.0, 0.0, 2.5, 0.0, 6.0]);
                assert_eq!(eq.filter, FilterKind::Fir);
            }
            other => panic!("Expected process command, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["eqsynth", "--verbose", "transfer"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Transfer {
                sample_rate,
                eq,
                latex,
            }) => {
                assert_eq!(sample_rate, 44100);
                assert_eq!(eq.gains, vec![0.0; 5]);
                assert_eq!(eq.filter, FilterKind::Iir);
                assert!(!latex);
            }
            other => panic!("Expected transfer command, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_filter() {
        let result = Cli::try_parse_from(["eqsynth", "response", "--filter", "notch"]);
        assert!(result.is_err());
    }
}
