//! Host platform and compiler detection
//!
//! Every lookup degrades to `None`/`false` instead of failing. The
//! environment reads are kept apart from the parsing so the parsing can be
//! exercised on any host.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::defaults::{ENV_VS_VERSION, MODERN_COMPILER_VERSION};

/// Host operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    MacOs,
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "MacOS",
        };
        f.write_str(name)
    }
}

/// Map a system name as reported by `std::env::consts::OS` to a family
///
/// Unix-likes other than macOS are treated as Linux.
pub fn os_from_name(name: &str) -> HostOs {
    match name {
        "windows" => HostOs::Windows,
        "macos" | "ios" => HostOs::MacOs,
        _ => HostOs::Linux,
    }
}

/// Operating system this process runs on
pub fn current_os() -> HostOs {
    os_from_name(std::env::consts::OS)
}

/// Active Xcode developer directory as reported by `xcode-select -p`
pub fn active_developer_directory() -> Option<PathBuf> {
    if current_os() != HostOs::MacOs {
        return None;
    }

    let output = Command::new("xcode-select").arg("-p").output().ok()?;
    if !output.status.success() {
        tracing::debug!("xcode-select exited with {}", output.status);
        return None;
    }

    let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dir))
    }
}

/// Visual Studio compiler location and `(major, minor)` version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInfo {
    pub path: PathBuf,
    pub version: (u32, u32),
}

impl CompilerInfo {
    /// Whether this is Visual Studio 2019 or newer
    pub fn is_modern(&self) -> bool {
        self.version >= MODERN_COMPILER_VERSION
    }
}

static VERSION_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// Extract the first `major.minor` pair from a version string
pub fn parse_compiler_version(raw: &str) -> Option<(u32, u32)> {
    let re = VERSION_PATTERN
        .get_or_init(|| Regex::new(r"(\d+)\.(\d+)").ok())
        .as_ref()?;
    let caps = re.captures(raw)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

/// Locate `cl` and read its version from the developer prompt environment
///
/// Only meaningful on Windows; returns `None` elsewhere.
pub fn compiler_and_version() -> Option<CompilerInfo> {
    if current_os() != HostOs::Windows {
        return None;
    }

    let path = which::which("cl").ok()?;
    let raw = std::env::var(ENV_VS_VERSION).ok()?;
    let version = parse_compiler_version(&raw)?;
    tracing::debug!(
        "Found MSVC at {} (version {}.{})",
        path.display(),
        version.0,
        version.1
    );
    Some(CompilerInfo { path, version })
}

/// Whether a Visual Studio 2019+ compiler is active
pub fn is_modern_compiler() -> bool {
    compiler_and_version().is_some_and(|info| info.is_modern())
}
