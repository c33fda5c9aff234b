//! Default values and well-known names
//!
//! Constants shared by the CMake driver, the install context and the CLI.

/// Name of the build transcript written inside the build directory
pub const LOG_FILE_NAME: &str = "build_log.txt";

/// Sentinel file used to check directory writability
pub const WRITE_CHECK_FILE: &str = "canwrite";

/// Subdirectory of the workspace holding per-variant build trees
pub const BUILD_SUBDIR: &str = "build";

/// Subdirectory of the workspace holding per-variant install trees
pub const INSTALL_SUBDIR: &str = "install";

/// Stages run when `--stages` is not given
pub const DEFAULT_STAGES: &str = "clean,configure,build,install";

/// Default variant name accepted on the command line
pub const DEFAULT_VARIANT: &str = "relWithDebInfo";

/// CMake executable name
pub const CMAKE: &str = "cmake";

/// Generator used on Windows with Visual Studio 2019 or newer
pub const VS2019_GENERATOR: &str = "Visual Studio 16 2019";

/// Generator used on Windows otherwise
pub const VS2017_GENERATOR: &str = "Visual Studio 15 2017 Win64";

/// Architecture selector appended for modern Visual Studio compilers
pub const X64_ARCH: &str = "x64";

/// First compiler version that counts as modern (Visual Studio 2019)
pub const MODERN_COMPILER_VERSION: (u32, u32) = (16, 0);

/// Environment variable set by the Visual Studio developer prompt
pub const ENV_VS_VERSION: &str = "VisualStudioVersion";

/// Message printed after a successful run
pub const SUCCESS_MESSAGE: &str = "Success build and install !!!";

/// Rule line framing each log section header
pub const LOG_RULE: &str =
    "#####################################################################################";
