//! Output formatting
//!
//! Run summary, status lines and error display.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::context::InstallContext;

/// How much the tool prints
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Default tracing level for this verbosity
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Whether subprocess output should be echoed to the console
    pub fn echo_commands(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// Resolved settings shown before building
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub source_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub build_dir: PathBuf,
    pub install_dir: PathBuf,
    pub variant: String,
    pub generator: Option<String>,
    pub jobs: usize,
    pub log_file: PathBuf,
    pub build_args: Vec<String>,
    pub stages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_dir: Option<PathBuf>,
}

impl Summary {
    pub fn new(ctx: &InstallContext, developer_dir: Option<PathBuf>) -> Self {
        Self {
            source_dir: ctx.source_dir().to_path_buf(),
            workspace_dir: ctx.workspace_dir().to_path_buf(),
            build_dir: ctx.build_dir().to_path_buf(),
            install_dir: ctx.install_dir().to_path_buf(),
            variant: ctx.variant().to_string(),
            generator: ctx.generator().map(str::to_string),
            jobs: ctx.jobs(),
            log_file: ctx.log_file().to_path_buf(),
            build_args: ctx.build_args().to_vec(),
            stages: ctx.stages().tokens().to_vec(),
            developer_dir,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Building with settings:")?;
        writeln!(f, "  Source directory          {}", self.source_dir.display())?;
        writeln!(f, "  Workspace directory       {}", self.workspace_dir.display())?;
        writeln!(f, "  Build directory           {}", self.build_dir.display())?;
        writeln!(f, "  Install directory         {}", self.install_dir.display())?;
        writeln!(f, "  Variant                   {}", self.variant)?;
        writeln!(
            f,
            "  CMake generator           {}",
            self.generator.as_deref().unwrap_or("Default")
        )?;
        writeln!(f, "  Parallel jobs             {}", self.jobs)?;
        if let Some(dir) = &self.developer_dir {
            writeln!(f, "  Developer directory       {}", dir.display())?;
        }
        write!(f, "  Build Log                 {}", self.log_file.display())?;
        if !self.build_args.is_empty() {
            write!(f, "\n  Build arguments           {:?}", self.build_args)?;
        }
        if !self.stages.is_empty() {
            write!(f, "\n  Stages arguments          {:?}", self.stages)?;
        }
        Ok(())
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
