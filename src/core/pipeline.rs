//! Build pipeline
//!
//! Directory preparation and the clean → configure → build → install run.

use crate::core::cmake::{self, HostInfo};
use crate::core::context::InstallContext;
use crate::error::{CmstageError, FilesystemError};
use crate::infra::filesystem;
use crate::infra::runner::Runner;

/// Make sure the workspace, build and install directories are usable
pub fn prepare_directories(ctx: &InstallContext) -> Result<(), FilesystemError> {
    for dir in ctx.required_dirs() {
        filesystem::ensure_writable(dir)?;
    }
    Ok(())
}

/// Run every requested pipeline stage, stopping at the first failure
pub fn build_and_install<R: Runner>(
    ctx: &InstallContext,
    host: HostInfo,
    runner: &mut R,
) -> Result<(), CmstageError> {
    let extra_args = ctx.configure_args();
    tracing::info!(
        "Running stages {:?} with {} jobs",
        ctx.stages().tokens(),
        ctx.jobs()
    );
    cmake::run_cmake(ctx, host, &extra_args, ctx.stages(), runner)
}
