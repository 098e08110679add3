//! BLAKE3 fingerprints for checkout directories
//!
//! A copy-mode checkout carries a sidecar file holding the fingerprint of the
//! source it was copied from. Comparing that against a fresh fingerprint of the
//! checkout tells whether anyone has edited it since.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::checkout::stub;
use crate::error::{HackError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Name of the fingerprint sidecar written into copy-mode checkouts
pub const SIDECAR_FILE: &str = ".gohack-modhash";

/// Top-level entries left out of a fingerprint
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    /// File names skipped unconditionally
    names: Vec<String>,

    /// `go.mod` contents that count as auto-generated and are skipped
    generated_go_mod: Option<String>,
}

impl Exclusions {
    /// Exclusions for a module checkout: the sidecar and our generated `go.mod`
    pub fn for_module(module_path: &str) -> Self {
        Self {
            names: vec![SIDECAR_FILE.to_string()],
            generated_go_mod: Some(stub::contents(module_path)),
        }
    }

    fn skips(&self, relative: &Path, full: &Path, is_link: bool) -> Result<bool> {
        let Some(name) = top_level_name(relative) else {
            return Ok(false);
        };
        if self.names.iter().any(|n| n == name) {
            return Ok(true);
        }
        match &self.generated_go_mod {
            Some(generated) if name == stub::GO_MOD_FILE && !is_link => {
                let data = fs::read(full).map_err(|e| HackError::FileReadFailed {
                    path: full.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(data == generated.as_bytes())
            }
            _ => Ok(false),
        }
    }
}

fn top_level_name(relative: &Path) -> Option<&str> {
    let mut components = relative.components();
    let first = components.next()?;
    if components.next().is_some() {
        return None;
    }
    first.as_os_str().to_str()
}

/// Calculate the fingerprint of a directory's contents
///
/// Hashes every regular file and symlink target recursively, sorted by relative path so that
/// creation order and timestamps never matter. Any error while walking or
/// reading aborts the whole computation.
pub fn fingerprint(path: &Path, exclusions: &Exclusions) -> Result<String> {
    if !path.is_dir() {
        return Err(HackError::FileReadFailed {
            path: path.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| HackError::FileReadFailed {
            path: e
                .path()
                .map_or_else(|| path.display().to_string(), |p| p.display().to_string()),
            reason: e.to_string(),
        })?;
        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(path)
            .unwrap_or(entry.path())
            .to_path_buf();
        if exclusions.skips(&relative, entry.path(), file_type.is_symlink())? {
            continue;
        }
        files.push((relative_key(&relative), file_type.is_symlink(), entry.into_path()));
    }

    // Sort for deterministic hashing
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Hasher::new();
    for (key, is_link, file_path) in files {
        hasher.update(key.as_bytes());
        hasher.update(b"\0");
        if is_link {
            // A link is its target, tagged so it never equals a file's contents.
            let target = fs::read_link(&file_path).map_err(|e| HackError::FileReadFailed {
                path: file_path.display().to_string(),
                reason: e.to_string(),
            })?;
            hasher.update(b"link:");
            hasher.update(target.to_string_lossy().as_bytes());
        } else {
            hasher.update(b"file:");
            hash_contents(&mut hasher, &file_path)?;
        }
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Forward-slash relative path, so fingerprints agree across platforms
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn hash_contents(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let read_failed = |e: std::io::Error| HackError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    let mut reader = BufReader::new(File::open(path).map_err(read_failed)?);
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_failed)?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}

/// Read the fingerprint stored in a checkout, `None` if there is no sidecar
pub fn read_sidecar(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(SIDECAR_FILE);
    match fs::read_to_string(&path) {
        Ok(data) => Ok(Some(data.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Store a fingerprint in a checkout
pub fn write_sidecar(dir: &Path, digest: &str) -> Result<()> {
    let path = dir.join(SIDECAR_FILE);
    fs::write(&path, digest).map_err(|e| HackError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let normalize = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_string();
    normalize(expected) == normalize(actual)
}
