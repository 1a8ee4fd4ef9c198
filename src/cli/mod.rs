//! CLI support for hcl-read
//!
//! Provides programmatic access to the `read` and `version` commands so they
//! can be driven without spawning the binary.

mod read;

pub use read::{ReadOptions, execute_read};

use std::io;

use thiserror::Error;

use crate::{FormatError, ParseError, QueryError, ReadError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// The input is not a valid configuration file
    #[error("failed to read file: {0}")]
    Document(#[source] ParseError),

    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    /// An attribute matched by the query could not be resolved
    #[error("failed to read file: {0}")]
    Read(#[from] ReadError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Pass a file or pipe HCL to stdin.")]
    NoInput,
}

/// Version string printed by `hcl-read version`.
///
/// The revision comes from `HCL_READ_REVISION` at build time.
pub fn version() -> String {
    format!(
        "{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("HCL_READ_REVISION").unwrap_or("unknown")
    )
}
