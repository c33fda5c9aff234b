//! CMake driver
//!
//! Builds the configure and build/install command lines for a context and
//! runs them from inside the build directory.

use crate::config::defaults::{CMAKE, VS2017_GENERATOR, VS2019_GENERATOR, X64_ARCH};
use crate::core::context::{InstallContext, Stage, StageSet};
use crate::error::CmstageError;
use crate::infra::filesystem::{self, WorkingDirGuard};
use crate::infra::platform::{self, HostOs};
use crate::infra::runner::Runner;

/// Host facts that influence generator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostInfo {
    pub os: HostOs,
    /// Visual Studio 2019 or newer is active
    pub modern_compiler: bool,
}

impl HostInfo {
    /// Detect the running host
    pub fn detect() -> Self {
        Self {
            os: platform::current_os(),
            modern_compiler: platform::is_modern_compiler(),
        }
    }
}

/// Pick the generator: the user's choice, or a Visual Studio default on Windows
pub fn select_generator(explicit: Option<&str>, host: HostInfo) -> Option<String> {
    match explicit {
        Some(generator) => Some(generator.to_string()),
        None if host.os == HostOs::Windows => Some(
            if host.modern_compiler {
                VS2019_GENERATOR
            } else {
                VS2017_GENERATOR
            }
            .to_string(),
        ),
        None => None,
    }
}

/// `-G <generator>` plus `-A x64` when a modern compiler is active
///
/// The architecture flag is added even for non-Visual Studio generators.
pub fn generator_args(generator: Option<&str>, host: HostInfo) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(generator) = generator {
        args.push("-G".to_string());
        args.push(generator.to_string());
    }
    if host.modern_compiler {
        args.push("-A".to_string());
        args.push(X64_ARCH.to_string());
    }
    args
}

/// Native build tool flag for `jobs` parallel jobs
///
/// Visual Studio takes `/M:N`, Xcode `-j N`, everything else `-jN`.
pub fn parallel_flag(jobs: usize, generator: Option<&str>) -> String {
    match generator {
        Some(g) if g.contains("Visual Studio") => format!("/M:{jobs}"),
        Some(g) if g.contains("Xcode") => format!("-j {jobs}"),
        _ => format!("-j{jobs}"),
    }
}

/// The configure invocation
pub fn configure_command(
    ctx: &InstallContext,
    generator_args: &[String],
    extra_args: &[String],
) -> Vec<String> {
    let mut command = vec![
        CMAKE.to_string(),
        format!("-DCMAKE_INSTALL_PREFIX={}", ctx.install_dir().display()),
        format!("-DCMAKE_BUILD_TYPE={}", ctx.variant()),
        "-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string(),
    ];
    command.extend(generator_args.iter().cloned());
    command.extend(extra_args.iter().cloned());
    command.push(ctx.source_dir().display().to_string());
    command
}

/// The build invocation, or `None` if neither build nor install was requested
pub fn build_command(
    ctx: &InstallContext,
    stages: &StageSet,
    generator: Option<&str>,
) -> Option<Vec<String>> {
    let install = stages.contains(Stage::Install);
    if !stages.contains(Stage::Build) && !install {
        return None;
    }

    let mut command = vec![
        CMAKE.to_string(),
        "--build".to_string(),
        ".".to_string(),
        "--config".to_string(),
        ctx.variant().to_string(),
    ];
    if install {
        command.push("--target".to_string());
        command.push("install".to_string());
    }
    command.push("--".to_string());
    command.extend(
        parallel_flag(ctx.jobs(), generator)
            .split_whitespace()
            .map(str::to_string),
    );
    Some(command)
}

/// Clean, configure, build and install as requested by `stages`
///
/// Commands run with the build directory as working directory; the previous
/// directory is restored however this returns. The log file is recreated.
/// The build and install directories exist on return, even after `clean`.
pub fn run_cmake<R: Runner>(
    ctx: &InstallContext,
    host: HostInfo,
    extra_args: &[String],
    stages: &StageSet,
    runner: &mut R,
) -> Result<(), CmstageError> {
    if stages.contains(Stage::Clean) {
        for dir in [ctx.build_dir(), ctx.install_dir()] {
            if filesystem::remove_dir_all_forced(dir)? {
                tracing::info!("Removed {}", dir.display());
            }
        }
    }

    filesystem::create_dir_all(ctx.build_dir())?;
    filesystem::create_dir_all(ctx.install_dir())?;

    let generator = select_generator(ctx.generator(), host);
    let gen_args = generator_args(generator.as_deref(), host);
    tracing::debug!("Generator arguments: {gen_args:?}");

    let _cwd = WorkingDirGuard::enter(ctx.build_dir())?;
    filesystem::remove_file_if_exists(ctx.log_file())?;

    if stages.contains(Stage::Configure) {
        runner.run(&configure_command(ctx, &gen_args, extra_args), ctx.log_file())?;
    }

    if let Some(command) = build_command(ctx, stages, generator.as_deref()) {
        runner.run(&command, ctx.log_file())?;
    }

    Ok(())
}
