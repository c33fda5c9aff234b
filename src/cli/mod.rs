//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::defaults::{DEFAULT_STAGES, DEFAULT_VARIANT, SUCCESS_MESSAGE};
use crate::core::cmake::HostInfo;
use crate::core::context::{ContextOptions, InstallContext};
use crate::core::pipeline;
use crate::core::timer::{format_elapsed, BuildTimer};
use crate::infra::platform;
use crate::infra::runner::LoggedRunner;
use output::{status, OutputConfig, Summary};

/// cmstage - staged CMake configure, build and install
///
/// Cleans, configures, builds and installs a CMake project into a
/// workspace, keeping a transcript of every CMake call in the build log.
#[derive(Parser, Debug)]
#[command(name = "cmstage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory used as a workspace to build and install into
    ///
    /// Give it before `--stages` or `--build-args`, which take several values.
    pub workspace_location: PathBuf,

    /// Directory holding the top-level CMakeLists.txt (default: current directory)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Directory where FBX is located
    #[arg(long, env = "FBX_LOCATION")]
    pub fbx_location: Option<PathBuf>,

    /// CMake generator to use
    #[arg(long, env = "CMSTAGE_GENERATOR")]
    pub generator: Option<String>,

    /// Arguments passed to CMake when configuring, comma-separated or
    /// space-separated
    ///
    /// Takes every following value, including ones that look like flags.
    /// Pass it last, or attach the value with `--build-args=-DA=1,-DB=2`.
    #[arg(
        long,
        value_name = "ARGS",
        num_args = 1..,
        allow_hyphen_values = true,
        action = clap::ArgAction::Append
    )]
    pub build_args: Vec<String>,

    /// Stages to execute, comma-separated or space-separated
    /// (clean, configure, build, install, test, package)
    #[arg(
        long,
        value_name = "STAGES",
        num_args = 1..,
        default_value = DEFAULT_STAGES,
        action = clap::ArgAction::Append
    )]
    pub stages: Vec<String>,

    /// Build variant: debug, release or relWithDebInfo
    #[arg(long, default_value = DEFAULT_VARIANT, env = "CMSTAGE_VARIANT")]
    pub variant: String,

    /// Number of build jobs to run in parallel (default: number of processors)
    #[arg(short, long, env = "CMSTAGE_JOBS", allow_negative_numbers = true)]
    pub jobs: Option<i64>,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the settings summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    fn context_options(&self) -> ContextOptions {
        let jobs = self
            .jobs
            .unwrap_or_else(|| i64::try_from(num_cpus::get().max(1)).unwrap_or(1));

        ContextOptions {
            workspace: self.workspace_location.clone(),
            source_dir: self.source_dir.clone(),
            fbx_location: self.fbx_location.clone(),
            generator: self.generator.clone(),
            build_args: self.build_args.clone(),
            stages: self.stages.clone(),
            variant: self.variant.clone(),
            jobs,
        }
    }

    /// Execute the requested stages
    pub fn run(self) -> Result<()> {
        let output = self.output_config();
        let ctx = InstallContext::new(self.context_options())?;

        let summary = Summary::new(&ctx, platform::active_developer_directory());
        if output.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !output.quiet {
            println!("{summary}");
        }

        pipeline::prepare_directories(&ctx)?;

        if !ctx.stages().runs_pipeline() {
            tracing::info!("No clean/configure/build/install stage requested");
            return Ok(());
        }

        let host = HostInfo::detect();
        tracing::debug!("Host: {} (modern compiler: {})", host.os, host.modern_compiler);

        let timer = BuildTimer::start();
        let mut runner = LoggedRunner::new(output.echo_commands());
        pipeline::build_and_install(&ctx, host, &mut runner)
            .with_context(|| format!("Build failed for {}", ctx.source_dir().display()))?;
        let elapsed = timer.stop();

        if !output.quiet && !output.json {
            println!("{} Elapsed time: {}", status::INFO, format_elapsed(elapsed));
            println!("{} {SUCCESS_MESSAGE}", status::SUCCESS);
        }
        Ok(())
    }
}
