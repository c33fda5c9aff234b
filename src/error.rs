//! Error types for cmstage
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Install context construction errors
#[derive(Error, Debug)]
pub enum ContextError {
    /// Job count must be positive
    #[error("Number of jobs must be greater than 0 (got {jobs})")]
    InvalidJobCount { jobs: i64 },

    /// Path could not be made absolute
    #[error("Could not resolve path '{path}': {error}")]
    UnresolvablePath { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Directory exists but cannot be written to
    #[error(
        "Could not write to directory {path}. Change permissions or choose a different location to install to"
    )]
    NotWritable { path: PathBuf },

    /// Failed to change the working directory
    #[error("Failed to change working directory to '{path}': {error}")]
    ChangeDir { path: PathBuf, error: String },
}

/// External command errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command could not be started
    #[error("Failed to start '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Command exited with a nonzero status
    #[error("Failed to run '{command}'\nSee {log} for more details.")]
    Failed { command: String, log: PathBuf },

    /// Log file could not be written or read
    #[error("Log file error for '{log}': {error}")]
    Log { log: PathBuf, error: String },
}

/// Top-level cmstage error type
#[derive(Error, Debug)]
pub enum CmstageError {
    /// Context error
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),
}
