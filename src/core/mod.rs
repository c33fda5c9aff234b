//! Core business logic
//!
//! Context resolution, CMake command composition and the stage pipeline.
//! Side effects are delegated to [`crate::infra`].

pub mod cmake;
pub mod context;
pub mod pipeline;
pub mod timer;
