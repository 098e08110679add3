//! The main module's `go.mod`
//!
//! The file is held as a list of lines in which only `replace` directives
//! are structured. Lines gohack does not touch are written back byte for
//! byte, so edits show up in a diff as exactly the directives that changed.

pub mod edit;
mod parser;
pub mod replace;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{HackError, Result};

pub use edit::UndoOutcome;
pub use replace::{ModuleVersion, PreviousState, Replace, SuffixComment};

pub const GO_MOD_FILE: &str = "go.mod";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    Text(String),

    /// `replace (`
    BlockOpen(String),

    /// `)` closing a replace block
    BlockClose(String),

    Replace(Replace),
}

/// A parsed `go.mod`
#[derive(Debug, Clone)]
pub struct ModFile {
    path: PathBuf,
    pub(crate) lines: Vec<Line>,
    pub(crate) trailing_newline: bool,
}

impl ModFile {
    /// Find the nearest `go.mod` at or above `start`
    pub fn find(start: &Path) -> Result<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(GO_MOD_FILE))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| HackError::ModFileNotFound {
                dir: start.display().to_string(),
            })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        parser::parse(path, content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file; relative replacement targets start here
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// All replace directives in file order
    pub fn replaces(&self) -> impl Iterator<Item = &Replace> {
        self.lines.iter().filter_map(|line| match line {
            Line::Replace(r) => Some(r),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out: Vec<String> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match line {
                Line::Text(raw) | Line::BlockOpen(raw) | Line::BlockClose(raw) => {
                    out.push(raw.clone());
                }
                Line::Replace(r) => {
                    if r.layout.leading_blank {
                        out.push(String::new());
                    }
                    out.push(r.render());
                }
            }
        }
        let mut text = out.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Write the file back, replacing it in one step
    ///
    /// The content goes to a temporary file next to `go.mod` which is then
    /// renamed over it, so a failure leaves the previous content intact.
    pub fn save(&self) -> Result<()> {
        let write_failed = |e: &dyn std::fmt::Display| HackError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };
        let content = self.render();
        let mut tmp = NamedTempFile::with_prefix_in(".go.mod", self.dir()).map_err(|e| write_failed(&e))?;
        tmp.write_all(content.as_bytes()).map_err(|e| write_failed(&e))?;
        if let Ok(meta) = fs::metadata(&self.path) {
            fs::set_permissions(tmp.path(), meta.permissions()).map_err(|e| write_failed(&e))?;
        }
        tmp.persist(&self.path).map_err(|e| write_failed(&e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GO_MOD_FILE), "module m\n").unwrap();
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(ModFile::find(&nested).unwrap(), temp.path().join(GO_MOD_FILE));
    }

    #[test]
    fn test_find_skips_go_mod_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GO_MOD_FILE), "module m\n").unwrap();
        let nested = temp.path().join("sub");
        fs::create_dir_all(nested.join(GO_MOD_FILE)).unwrap();

        assert_eq!(ModFile::find(&nested).unwrap(), temp.path().join(GO_MOD_FILE));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ModFile::load(&temp.path().join(GO_MOD_FILE)).unwrap_err();
        assert!(matches!(err, HackError::FileReadFailed { .. }));
    }

    #[test]
    fn test_save_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(GO_MOD_FILE);
        fs::write(&path, "module m\n").unwrap();

        let mut file = ModFile::load(&path).unwrap();
        file.replace_module("example.com/a", "/cache/a");
        file.save().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "module m\n\nreplace example.com/a => /cache/a\n"
        );
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, [GO_MOD_FILE]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join(GO_MOD_FILE);
        fs::write(&path, "module m\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        ModFile::load(&path).unwrap().save().unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_dir_is_parent() {
        let file = ModFile::parse(Path::new("/work/main/go.mod"), "module m\n").unwrap();
        assert_eq!(file.dir(), Path::new("/work/main"));
        assert_eq!(file.path(), Path::new("/work/main/go.mod"));
    }
}
