//! Tracing subscriber initialization.
//!
//! The state managers only emit `tracing` events: store mutations at `trace`,
//! hydration and navigations at `debug`. Hosts that want them on disk call
//! [`init`] once with their [`ResolvedConfig`]; the file never shares output
//! with the host's own console.

use crate::config::ResolvedConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Log path has no usable file name
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// `log_filter` is not a valid set of directives
    #[error("Invalid log filter {directives:?}: {source}")]
    InvalidFilter {
        /// The rejected directives
        directives: String,
        /// Parser error
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split a log path into the directory to create and the file name to write.
///
/// A bare file name logs to the working directory.
fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    if directory.as_os_str().is_empty() {
        return Ok((Path::new("."), file_name));
    }
    Ok((directory, file_name))
}

fn build_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|source| LoggingError::InvalidFilter {
        directives: directives.to_string(),
        source,
    })
}

/// Install a file subscriber for `config.log_file_path`, filtered by
/// `config.log_filter`.
///
/// `RUST_LOG=tablestate=debug`-style directives go in `log_filter` (or the
/// `TABLESTATE_LOG` override); with `tablestate=debug` every URL a table
/// visits is logged.
///
/// # Errors
///
/// Returns an error if the path or filter is unusable, the directory cannot
/// be created, or a global subscriber is already installed. The path and
/// filter are validated before anything is created on disk.
pub fn init(config: &ResolvedConfig) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(&config.log_file_path)?;
    let filter = build_filter(&config.log_filter)?;

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(tracing_appender::rolling::never(directory, file_name))
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
