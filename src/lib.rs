//! cmstage - staged CMake configure, build and install
//!
//! Wraps CMake so a native project can be cleaned, configured, built and
//! installed into a per-variant workspace with one command, with every
//! CMake call recorded in a build log.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Install context, CMake command composition and the stage pipeline
//! - [`infra`] - Infrastructure layer (filesystem, host probing, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
