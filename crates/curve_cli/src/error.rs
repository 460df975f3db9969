//! CLI error types

use curve_core::config::ConfigError;
use curve_core::types::CurveError;
use thiserror::Error;

/// Errors surfaced by the `curves` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
