//! curves - Command Line Operations on Date Curves
//!
//! Reads a curve persisted as JSON and evaluates or transforms it.
//!
//! # Commands
//!
//! - `curves value --curve <file> --date <date>` - Evaluate the curve
//! - `curves rate --curve <file> --effective <date> --termination <date|tenor>` - Period rate
//! - `curves nodes --curve <file>` - List node dates and values
//! - `curves shift --curve <file> --spread <bp>` - Shift by a spread
//! - `curves translate --curve <file> --start <date>` - Re-anchor
//! - `curves roll --curve <file> --target <date|tenor>` - Roll along the date axis
//!
//! Transformations write the resulting curve JSON to `--output` or stdout.
//! Construction defaults for fields missing from the JSON come from
//! `--config` and `CURVE_DEFAULT_*` environment variables.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use curve_core::market_data::curves::Horizon;
use curve_core::types::BusinessDayConvention;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Date curve operations
#[derive(Parser)]
#[command(name = "curves")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Curve defaults file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the curve at a date
    Value {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,

        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Differentiation order (0, 1, 2)
        #[arg(long)]
        ad: Option<u8>,
    },

    /// Rate between two dates, or a date and a tenor
    Rate {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,

        /// Effective date (YYYY-MM-DD)
        #[arg(short, long)]
        effective: NaiveDate,

        /// Termination date or tenor (e.g. 2023-01-01, 6m, -6m)
        #[arg(short, long, allow_hyphen_values = true)]
        termination: Horizon,

        /// Business day modifier for tenors (F, MF, P, MP, NONE)
        #[arg(short, long)]
        modifier: Option<BusinessDayConvention>,
    },

    /// List node dates and values
    Nodes {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,
    },

    /// Shift the curve by a spread in basis points
    Shift {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,

        /// Spread in basis points
        #[arg(short, long, allow_hyphen_values = true)]
        spread: f64,

        /// Output file for the shifted curve
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-anchor the curve at a later start date
    Translate {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,

        /// New anchor date (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,

        /// Move the left spline knots to the new anchor
        #[arg(long)]
        extend_knots: bool,

        /// Output file for the translated curve
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Roll the curve to a date or by a tenor
    Roll {
        /// Path to curve JSON
        #[arg(long)]
        curve: PathBuf,

        /// Target date or tenor (e.g. 2022-02-01, 1m, -10d)
        #[arg(short, long, allow_hyphen_values = true)]
        target: Horizon,

        /// Output file for the rolled curve
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries results
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let defaults = commands::load_defaults(cli.config.as_deref())?;
    debug!(?defaults, "curve defaults");

    match cli.command {
        Commands::Value { curve, date, ad } => commands::inspect::value(&curve, &defaults, date, ad),
        Commands::Rate {
            curve,
            effective,
            termination,
            modifier,
        } => commands::inspect::rate(&curve, &defaults, effective, termination, modifier),
        Commands::Nodes { curve } => commands::inspect::nodes(&curve, &defaults),
        Commands::Shift {
            curve,
            spread,
            output,
        } => commands::transform::shift(&curve, &defaults, spread, output.as_deref()),
        Commands::Translate {
            curve,
            start,
            extend_knots,
            output,
        } => commands::transform::translate(&curve, &defaults, start, extend_knots, output.as_deref()),
        Commands::Roll {
            curve,
            target,
            output,
        } => commands::transform::roll(&curve, &defaults, target, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_accepts_negative_tenor() {
        let cli = Cli::try_parse_from([
            "curves",
            "rate",
            "--curve",
            "curve.json",
            "--effective",
            "2022-07-01",
            "--termination",
            "-6m",
        ])
        .unwrap();
        match cli.command {
            Commands::Rate { termination, .. } => {
                assert_eq!(termination, "-6m".parse::<Horizon>().unwrap());
            }
            _ => panic!("expected rate command"),
        }
    }

    #[test]
    fn test_roll_accepts_negative_tenor() {
        let cli = Cli::try_parse_from([
            "curves", "roll", "--curve", "curve.json", "--target", "-10d",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Roll { .. }));
    }
}
