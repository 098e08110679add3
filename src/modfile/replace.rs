//! Replace directives and their marker comments
//!
//! When gohack takes over an existing directive it records what the
//! directive used to say in its trailing comment:
//!
//! ```text
//! replace example.com/m => /home/me/gohack/example.com/m // was example.com/m v1.0.0 => example.com/fork v1.1.0 // original comment
//! ```
//!
//! The marker is decoded into [`SuffixComment::Previous`] when the manifest
//! is read and only turned back into text when it is written.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::is_valid_semver;

#[allow(clippy::unwrap_used)]
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^// was ([^ ]+(?: [^ ]+)?) => ([^ ]+(?: [^ ]+)?)(?: (//.+))?$").unwrap()
});

/// One side of a replace directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleVersion {
    pub path: String,

    /// Empty on the old side for "any version", on the new side for a
    /// directory
    pub version: String,
}

impl ModuleVersion {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Parse `path` or `path version` as written in a marker
    fn from_marker(s: &str) -> Option<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        match fields[..] {
            [path] => Some(Self::new(path, "")),
            [path, version] if is_valid_semver(version) => Some(Self::new(path, version)),
            _ => None,
        }
    }

    /// Tokens as they appear in a directive, quoted where needed
    fn tokens(&self) -> String {
        if self.version.is_empty() {
            quote_token(&self.path)
        } else {
            format!("{} {}", quote_token(&self.path), quote_token(&self.version))
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{} {}", self.path, self.version)
        }
    }
}

/// Trailing `//` comment on a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixComment {
    /// Any other comment, including its leading `//`
    Plain(String),

    /// What the directive looked like before gohack rewrote it
    Previous(Box<PreviousState>),
}

impl SuffixComment {
    /// Decode comment text, recognising (possibly nested) markers
    pub fn decode(text: &str) -> Self {
        Self::decode_marker(text).unwrap_or_else(|| SuffixComment::Plain(text.to_string()))
    }

    fn decode_marker(text: &str) -> Option<Self> {
        let caps = MARKER_RE.captures(text)?;
        let old = ModuleVersion::from_marker(&caps[1])?;
        let new = ModuleVersion::from_marker(&caps[2])?;
        let comment = caps.get(3).map(|m| Self::decode(m.as_str()));
        Some(SuffixComment::Previous(Box::new(PreviousState {
            old,
            new,
            comment,
        })))
    }

    pub fn encode(&self) -> String {
        match self {
            SuffixComment::Plain(text) => text.clone(),
            SuffixComment::Previous(prev) => {
                let mut text = format!("// was {} => {}", prev.old, prev.new);
                if let Some(comment) = &prev.comment {
                    text.push(' ');
                    text.push_str(&comment.encode());
                }
                text
            }
        }
    }
}

/// Snapshot of a directive taken before it was redirected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousState {
    pub old: ModuleVersion,
    pub new: ModuleVersion,
    pub comment: Option<SuffixComment>,
}

/// How a directive sits in the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Layout {
    /// Inside a `replace ( ... )` block
    pub in_block: bool,

    /// Leading whitespace
    pub indent: String,

    /// Preceded by a blank line that belongs to this directive
    pub leading_blank: bool,

    /// Original text, re-emitted as is while the directive is unchanged
    pub raw: Option<String>,
}

/// A `replace` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    pub old: ModuleVersion,
    pub new: ModuleVersion,
    pub comment: Option<SuffixComment>,
    pub(crate) layout: Layout,
}

impl Replace {
    /// Replaced by a directory rather than another module
    pub fn is_directory(&self) -> bool {
        self.new.version.is_empty()
    }

    pub fn in_block(&self) -> bool {
        self.layout.in_block
    }

    /// Forget the original text so the directive is rendered afresh
    pub(crate) fn touch(&mut self) {
        self.layout.raw = None;
    }

    /// Render the directive line
    pub fn render(&self) -> String {
        if let Some(raw) = &self.layout.raw {
            return raw.clone();
        }
        let mut line = self.layout.indent.clone();
        if !self.layout.in_block {
            line.push_str("replace ");
        }
        line.push_str(&self.old.tokens());
        line.push_str(" => ");
        line.push_str(&self.new.tokens());
        if let Some(comment) = &self.comment {
            line.push(' ');
            line.push_str(&comment.encode());
        }
        line
    }
}

/// Quote a token the way `go.mod` expects when it would not lex as one word
fn quote_token(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.contains("//")
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '`' | '(' | ')' | '\\') || c.is_control());
    if !needs_quotes {
        return s.to_string();
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
