//! Test utilities
//!
//! Proptest generators, a lock serializing tests that change the
//! process working directory, and a check for permission enforcement.

#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Hold this while a test changes the working directory
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether read-only directories actually refuse writes under `scratch`
///
/// False when running as root, where permission bits are bypassed.
#[cfg(unix)]
pub fn permissions_enforced(scratch: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch.join("read-only-check");
    fs::create_dir_all(&dir).unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();
    let enforced = fs::File::create(dir.join("file")).is_err();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
    fs::remove_dir_all(&dir).unwrap();
    enforced
}

pub mod generators {
    use proptest::prelude::*;

    /// Generate a CMake generator name
    pub fn generator_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Unix Makefiles".to_string()),
            Just("Ninja".to_string()),
            Just("Ninja Multi-Config".to_string()),
            Just("Xcode".to_string()),
            Just("Visual Studio 16 2019".to_string()),
            Just("Visual Studio 17 2022".to_string()),
            "[A-Za-z][A-Za-z0-9 ]{0,20}",
        ]
    }

    /// Generate a plain CLI token (no commas)
    pub fn token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_=-]{1,12}"
    }

    /// Generate a stage name, including ones the pipeline ignores
    pub fn stage() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("clean".to_string()),
            Just("configure".to_string()),
            Just("build".to_string()),
            Just("install".to_string()),
            Just("test".to_string()),
            Just("package".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_generator_name_not_empty(name in generator_name()) {
            prop_assert!(!name.is_empty());
        }

        #[test]
        fn test_token_has_no_commas(tok in token()) {
            prop_assert!(!tok.contains(','));
        }

        #[test]
        fn test_stage_is_known(s in stage()) {
            prop_assert!(crate::core::context::Stage::parse(&s).is_some());
        }
    }
}
