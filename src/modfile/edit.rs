//! Adding and removing gohack's replace directives
//!
//! `replace_module` and `undo_module` are inverses: undoing a module right
//! after replacing it gives back the file as it was, including any directive
//! that the replacement took over.

use super::replace::{Layout, ModuleVersion, PreviousState, Replace, SuffixComment};
use super::{Line, ModFile};
use crate::error::{HackError, Result};

/// What undoing a module did to its directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The directive was removed
    Dropped,

    /// The directive it replaced was put back
    Restored,
}

impl UndoOutcome {
    pub fn verb(self) -> &'static str {
        match self {
            UndoOutcome::Dropped => "dropped",
            UndoOutcome::Restored => "restored",
        }
    }
}

impl ModFile {
    /// Check that `path` can be pointed at a directory
    ///
    /// Fails with [`HackError::AlreadyReplaced`] when the module is already
    /// replaced by a directory, so callers can decide whether that directory
    /// is one of ours.
    pub fn check_can_replace(&self, path: &str) -> Result<()> {
        let matching: Vec<&Replace> = self.replaces().filter(|r| r.old.path == path).collect();
        match matching[..] {
            [] => Ok(()),
            [r] if r.is_directory() => Err(HackError::AlreadyReplaced {
                path: path.to_string(),
                target: r.new.path.clone(),
            }),
            [_] => Ok(()),
            _ => Err(HackError::MultipleReplacements {
                path: path.to_string(),
            }),
        }
    }

    /// Point `path` at `dir`, taking over an existing directive if there is one
    pub fn replace_module(&mut self, path: &str, dir: &str) {
        let existing = self.lines.iter_mut().find_map(|line| match line {
            Line::Replace(r) if r.old.path == path => Some(r),
            _ => None,
        });
        if let Some(r) = existing {
            let previous = PreviousState {
                old: r.old.clone(),
                new: r.new.clone(),
                comment: r.comment.take(),
            };
            r.old.version.clear();
            r.new = ModuleVersion::new(dir, "");
            r.comment = Some(SuffixComment::Previous(Box::new(previous)));
            r.touch();
            return;
        }
        self.insert(Replace {
            old: ModuleVersion::new(path, ""),
            new: ModuleVersion::new(dir, ""),
            comment: None,
            layout: Layout::default(),
        });
    }

    /// Add a new directive after the last existing one
    fn insert(&mut self, mut replace: Replace) {
        let last = self.lines.iter().rposition(|l| matches!(l, Line::Replace(_)));
        match last {
            Some(idx) => {
                if let Line::Replace(prev) = &self.lines[idx] {
                    if prev.in_block() {
                        replace.layout.in_block = true;
                        replace.layout.indent = prev.layout.indent.clone();
                    }
                }
                self.lines.insert(idx + 1, Line::Replace(replace));
            }
            None => {
                replace.layout.leading_blank =
                    self.lines.last().is_some_and(|l| !is_blank(l));
                if self.lines.is_empty() {
                    self.trailing_newline = true;
                }
                self.lines.push(Line::Replace(replace));
            }
        }
    }

    /// Stop replacing `path` by a directory
    pub fn undo_module(&mut self, path: &str) -> Result<UndoOutcome> {
        let not_replaced = || HackError::NotReplaced {
            path: path.to_string(),
        };
        let candidates: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| match line {
                Line::Replace(r) if r.old.path == path && r.old.version.is_empty() => Some(i),
                _ => None,
            })
            .collect();
        let idx = match candidates[..] {
            [] => return Err(not_replaced()),
            [idx] => idx,
            _ => {
                return Err(HackError::MultipleReplacements {
                    path: path.to_string(),
                });
            }
        };
        let Some(Line::Replace(r)) = self.lines.get_mut(idx) else {
            return Err(not_replaced());
        };
        if !r.is_directory() {
            return Err(not_replaced());
        }

        match r.comment.take() {
            Some(SuffixComment::Previous(prev)) if prev.old.path == path => {
                let PreviousState { old, new, comment } = *prev;
                r.old = old;
                r.new = new;
                r.comment = comment;
                r.touch();
                Ok(UndoOutcome::Restored)
            }
            other => {
                r.comment = other;
                self.remove_directive(idx);
                Ok(UndoOutcome::Dropped)
            }
        }
    }

    /// Directives that point a module at a directory
    pub fn directory_replacements(&self) -> impl Iterator<Item = &Replace> {
        self.replaces()
            .filter(|r| r.old.version.is_empty() && r.is_directory())
    }

    /// Remove the directive at `idx`, and its block if that leaves it empty
    fn remove_directive(&mut self, idx: usize) {
        let Line::Replace(removed) = self.lines.remove(idx) else {
            return;
        };
        if !removed.in_block() {
            // Keep the separation between the lines around it.
            let prev_text = idx > 0 && !is_blank(&self.lines[idx - 1]);
            let next_text = self.lines.get(idx).is_some_and(|l| !is_separated(l));
            if removed.layout.leading_blank && prev_text && next_text {
                self.lines.insert(idx, Line::Text(String::new()));
            }
            return;
        }

        let Some(open) = self.lines[..idx]
            .iter()
            .rposition(|l| matches!(l, Line::BlockOpen(_)))
        else {
            return;
        };
        let Some(close) = self.lines[idx..]
            .iter()
            .position(|l| matches!(l, Line::BlockClose(_)))
            .map(|p| p + idx)
        else {
            return;
        };
        if !self.lines[open + 1..close].iter().all(is_blank) {
            return;
        }

        // Take a separating blank line with the block when nothing follows it.
        let after_blank = self.lines.get(close + 1).is_none_or(is_blank);
        let start = if open > 0 && is_blank(&self.lines[open - 1]) && after_blank {
            open - 1
        } else {
            open
        };
        self.lines.drain(start..=close);
    }
}

fn is_blank(line: &Line) -> bool {
    matches!(line, Line::Text(text) if text.trim().is_empty())
}

/// Blank, or a directive that renders its own blank line before it
fn is_separated(line: &Line) -> bool {
    is_blank(line) || matches!(line, Line::Replace(r) if r.layout.leading_blank)
}
