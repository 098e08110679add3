//! Common file system operations with unified error handling

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::{HackError, Result};

/// Copy `src` to `dst`, which must not exist yet
///
/// Directories are copied recursively. Only regular files and directories
/// are accepted: symbolic links and special files abort the copy. File
/// contents are copied without their permissions, so a copy of a read-only
/// module cache is writable.
pub fn copy_all(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(|e| read_failed(src, &e))?;
    match fs::symlink_metadata(dst) {
        Ok(_) => {
            return Err(HackError::FileWriteFailed {
                path: dst.display().to_string(),
                reason: "will not overwrite existing file".to_string(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(read_failed(dst, &e)),
    }

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        Err(HackError::FileReadFailed {
            path: src.display().to_string(),
            reason: "will not copy symbolic link".to_string(),
        })
    } else if file_type.is_dir() {
        copy_dir(src, dst)
    } else if file_type.is_file() {
        copy_file(src, dst)
    } else {
        Err(HackError::FileReadFailed {
            path: src.display().to_string(),
            reason: "cannot copy special file".to_string(),
        })
    }
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir(dst).map_err(|e| write_failed(dst, &e))?;
    for entry in fs::read_dir(src).map_err(|e| read_failed(src, &e))? {
        let entry = entry.map_err(|e| read_failed(src, &e))?;
        let name = entry.file_name();
        copy_all(&src.join(&name), &dst.join(&name))?;
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    let mut reader = File::open(src).map_err(|e| read_failed(src, &e))?;
    let mut writer = File::create(dst).map_err(|e| write_failed(dst, &e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| HackError::FileWriteFailed {
        path: dst.display().to_string(),
        reason: format!("cannot copy from {}: {}", src.display(), e),
    })?;
    Ok(())
}

/// Report whether `dir` has no entries
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| read_failed(dir, &e))?;
    Ok(entries.next().is_none())
}

/// Remove a directory tree, making read-only directories writable first
pub fn remove_dir_all(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            make_writable(dir)?;
            fs::remove_dir_all(dir).map_err(|e| write_failed(dir, &e))
        }
        Err(e) => Err(write_failed(dir, &e)),
    }
}

#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(dir: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|e| HackError::FileReadFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if entry.path_is_symlink() {
            continue;
        }
        let meta = entry.metadata().map_err(|e| HackError::FileReadFailed {
            path: entry.path().display().to_string(),
            reason: e.to_string(),
        })?;
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            fs::set_permissions(entry.path(), perms).map_err(|e| write_failed(entry.path(), &e))?;
        }
    }
    Ok(())
}

fn read_failed(path: &Path, e: &io::Error) -> HackError {
    HackError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn write_failed(path: &Path, e: &io::Error) -> HackError {
    HackError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
