//! Checkout locations
//!
//! Every hacked module lives under a single cache root, at a path derived
//! from its module path.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::{HackError, Result};

/// Environment variable selecting the cache root
pub const CACHE_ROOT_ENV: &str = "GOHACK";

/// Default cache directory name under the user's home directory
const DEFAULT_DIR: &str = "gohack";

/// Get the cache root directory
///
/// Uses `$GOHACK` when set and non-empty, otherwise `gohack` in the user's
/// home directory.
pub fn cache_root() -> Result<PathBuf> {
    cache_root_from(std::env::var_os(CACHE_ROOT_ENV), dirs::home_dir())
}

fn cache_root_from(env: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home.ok_or_else(|| HackError::CacheRootUnavailable {
        reason: "could not determine home directory".to_string(),
    })?;
    Ok(home.join(DEFAULT_DIR))
}

/// Directory a copy-mode checkout of `module_path` is placed in
pub fn module_dir(root: &Path, module_path: &str) -> PathBuf {
    join_slash_path(root, module_path)
}

/// Join a `/`-separated path onto `base`
pub fn join_slash_path(base: &Path, slash_path: &str) -> PathBuf {
    slash_path
        .split('/')
        .filter(|elem| !elem.is_empty())
        .fold(base.to_path_buf(), |dir, elem| dir.join(elem))
}

/// Report whether `dir` is `root` or lies below it, without touching the
/// file system
pub fn is_within(dir: &Path, root: &Path) -> bool {
    let dir = normalize(dir);
    let root = normalize(root);
    dir.starts_with(&root)
}

/// Resolve a directory named in `go.mod`, which may be relative to the
/// directory holding the manifest
pub fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_cache_root_from_env() {
        let root = cache_root_from(
            Some(OsString::from("/tmp/hacks")),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/tmp/hacks"));
    }

    #[test]
    fn test_cache_root_empty_env_uses_home() {
        let root = cache_root_from(Some(OsString::new()), Some(PathBuf::from("/home/me"))).unwrap();
        assert_eq!(root, PathBuf::from("/home/me").join("gohack"));
    }

    #[test]
    fn test_cache_root_without_home_fails() {
        let err = cache_root_from(None, None).unwrap_err();
        assert!(matches!(err, HackError::CacheRootUnavailable { .. }));
    }

    #[test]
    fn test_module_dir() {
        let dir = module_dir(Path::new("/cache"), "example.com/foo/bar");
        assert_eq!(
            dir,
            Path::new("/cache").join("example.com").join("foo").join("bar")
        );
    }

    #[test]
    fn test_is_within() {
        assert!(is_within(Path::new("/cache/a/b"), Path::new("/cache")));
        assert!(is_within(Path::new("/cache"), Path::new("/cache")));
        assert!(!is_within(Path::new("/cache/../other"), Path::new("/cache")));
        assert!(!is_within(Path::new("/cachex/a"), Path::new("/cache")));
    }

    #[test]
    fn test_resolve_dir() {
        let base = Path::new("/project");
        assert_eq!(resolve_dir(base, "../dep"), Path::new("/project/../dep"));
        assert_eq!(resolve_dir(base, "/abs/dep"), Path::new("/abs/dep"));
    }

    #[test]
    #[serial]
    fn test_cache_root_reads_environment() {
        let original = std::env::var_os(CACHE_ROOT_ENV);
        unsafe {
            std::env::set_var(CACHE_ROOT_ENV, "/tmp/gohack-env-test");
        }

        let root = cache_root().unwrap();

        unsafe {
            match original {
                Some(value) => std::env::set_var(CACHE_ROOT_ENV, value),
                None => std::env::remove_var(CACHE_ROOT_ENV),
            }
        }
        assert_eq!(root, PathBuf::from("/tmp/gohack-env-test"));
    }
}
