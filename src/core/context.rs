//! Install context
//!
//! The resolved, read-only configuration for one run: directories, build
//! variant, generator, job count and the flattened build-argument and stage
//! lists.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::defaults::{BUILD_SUBDIR, INSTALL_SUBDIR, LOG_FILE_NAME};
use crate::error::ContextError;

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    Debug,
    Release,
    #[default]
    RelWithDebInfo,
}

impl Variant {
    /// Map a command-line variant name to a build type
    ///
    /// Unrecognized names fall back to `RelWithDebInfo`.
    pub fn from_cli(name: &str) -> Self {
        match name {
            "debug" => Self::Debug,
            "release" => Self::Release,
            "relWithDebInfo" => Self::RelWithDebInfo,
            other => {
                tracing::warn!("Unknown variant '{other}', using RelWithDebInfo");
                Self::RelWithDebInfo
            }
        }
    }

    /// Value for `CMAKE_BUILD_TYPE` and `--config`
    pub fn cmake_name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmake_name())
    }
}

/// A pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Configure,
    Build,
    Install,
    Test,
    Package,
}

impl Stage {
    /// Stages that trigger the clean/configure/build/install pipeline
    pub const PIPELINE: [Stage; 4] = [Stage::Clean, Stage::Configure, Stage::Build, Stage::Install];

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "clean" => Some(Self::Clean),
            "configure" => Some(Self::Configure),
            "build" => Some(Self::Build),
            "install" => Some(Self::Install),
            "test" => Some(Self::Test),
            "package" => Some(Self::Package),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Install => "install",
            Self::Test => "test",
            Self::Package => "package",
        }
    }
}

/// Requested stage tokens, in command-line order
///
/// Unknown tokens are kept but never acted upon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSet {
    tokens: Vec<String>,
}

impl StageSet {
    pub fn new(tokens: Vec<String>) -> Self {
        for token in &tokens {
            if Stage::parse(token).is_none() {
                tracing::warn!("Ignoring unknown stage '{token}'");
            }
        }
        Self { tokens }
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.tokens.iter().any(|t| t == stage.as_str())
    }

    /// Whether any of clean, configure, build or install was requested
    pub fn runs_pipeline(&self) -> bool {
        Stage::PIPELINE.iter().any(|s| self.contains(*s))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Raw settings collected from the command line
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Workspace root holding `build/` and `install/`
    pub workspace: PathBuf,
    /// Directory with the top-level `CMakeLists.txt` (current dir if unset)
    pub source_dir: Option<PathBuf>,
    /// FBX SDK location forwarded as `FBX_LOCATION`
    pub fbx_location: Option<PathBuf>,
    pub generator: Option<String>,
    /// Comma-separated lists of extra configure arguments
    pub build_args: Vec<String>,
    /// Comma-separated lists of stage names
    pub stages: Vec<String>,
    pub variant: String,
    pub jobs: i64,
}

/// Resolved configuration for a run
#[derive(Debug, Clone)]
pub struct InstallContext {
    source_dir: PathBuf,
    workspace_dir: PathBuf,
    build_dir: PathBuf,
    install_dir: PathBuf,
    log_file: PathBuf,
    variant: Variant,
    generator: Option<String>,
    jobs: usize,
    fbx_location: Option<PathBuf>,
    build_args: Vec<String>,
    stages: StageSet,
}

impl InstallContext {
    /// Resolve options into a context
    ///
    /// The job count is checked before anything else is resolved.
    pub fn new(options: ContextOptions) -> Result<Self, ContextError> {
        let jobs = usize::try_from(options.jobs)
            .ok()
            .filter(|&j| j > 0)
            .ok_or(ContextError::InvalidJobCount { jobs: options.jobs })?;

        let source_dir = match options.source_dir {
            Some(dir) => absolutize(&dir)?,
            None => std::env::current_dir().map_err(|e| ContextError::UnresolvablePath {
                path: PathBuf::from("."),
                error: e.to_string(),
            })?,
        };
        let workspace_dir = absolutize(&options.workspace)?;
        let fbx_location = options.fbx_location.as_deref().map(absolutize).transpose()?;

        let variant = Variant::from_cli(&options.variant);
        let build_dir = workspace_dir.join(BUILD_SUBDIR).join(variant.cmake_name());
        let install_dir = workspace_dir.join(INSTALL_SUBDIR).join(variant.cmake_name());
        let log_file = build_dir.join(LOG_FILE_NAME);

        Ok(Self {
            source_dir,
            workspace_dir,
            build_dir,
            install_dir,
            log_file,
            variant,
            generator: options.generator.filter(|g| !g.is_empty()),
            jobs,
            fbx_location,
            build_args: split_token_lists(&options.build_args),
            stages: StageSet::new(split_token_lists(&options.stages)),
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Generator given by the user, if any
    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn fbx_location(&self) -> Option<&Path> {
        self.fbx_location.as_deref()
    }

    pub fn build_args(&self) -> &[String] {
        &self.build_args
    }

    pub fn stages(&self) -> &StageSet {
        &self.stages
    }

    /// Extra configure arguments: the FBX define followed by user arguments
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.build_args.len() + 1);
        if let Some(fbx) = &self.fbx_location {
            args.push(format!("-DFBX_LOCATION={}", fbx.display()));
        }
        args.extend(self.build_args.iter().cloned());
        args
    }

    /// Directories that must exist and be writable before building
    pub fn required_dirs(&self) -> [&Path; 3] {
        [&self.workspace_dir, &self.build_dir, &self.install_dir]
    }
}

/// Flatten `["a,b", "c"]` into `["a", "b", "c"]`, dropping empty tokens
pub fn split_token_lists<S: AsRef<str>>(lists: &[S]) -> Vec<String> {
    lists
        .iter()
        .flat_map(|list| list.as_ref().split(','))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Make a path absolute against the current directory and drop `.`/`..`
fn absolutize(path: &Path) -> Result<PathBuf, ContextError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ContextError::UnresolvablePath {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
