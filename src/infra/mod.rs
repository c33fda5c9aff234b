//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem, host probing and external
//! processes. This module is the only place where side effects occur.

pub mod filesystem;
pub mod platform;
pub mod runner;
