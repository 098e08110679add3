//! Line-oriented `go.mod` reader
//!
//! Only `replace` directives are understood. Every other line is kept as
//! text so that it can be written back exactly as it was read.

use std::path::Path;

use super::replace::{Layout, ModuleVersion, Replace, SuffixComment};
use super::{Line, ModFile};
use crate::error::{HackError, Result};

const REPLACE_USAGE: &str = "usage: replace module/path [v1.2.3] => other/module v1.4\n\t or replace module/path [v1.2.3] => ../local/directory";

/// Tokens of one line plus its trailing comment
#[derive(Debug, Default, PartialEq, Eq)]
struct Lexed {
    tokens: Vec<String>,
    comment: Option<String>,
}

/// Block the parser is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Replace,
    Other,
}

pub(crate) fn parse(path: &Path, content: &str) -> Result<ModFile> {
    let trailing_newline = content.ends_with('\n');
    let body = content.strip_suffix('\n').unwrap_or(content);
    let mut lines: Vec<Line> = Vec::new();
    let mut block = Block::None;
    let mut line_count = 0;

    if !content.is_empty() {
        for (idx, raw) in body.split('\n').enumerate() {
            line_count = idx + 1;
            let fail = |reason: String| HackError::ModFileParseFailed {
                path: path.display().to_string(),
                line: idx + 1,
                reason,
            };
            let lexed = lex(raw).map_err(&fail)?;
            let first = lexed.tokens.first().map(String::as_str);

            let line = match block {
                Block::Replace if first == Some(")") => {
                    if lexed.tokens.len() > 1 {
                        return Err(fail("unexpected token after )".to_string()));
                    }
                    block = Block::None;
                    Line::BlockClose(raw.to_string())
                }
                Block::Replace if lexed.tokens.is_empty() => Line::Text(raw.to_string()),
                Block::Replace => {
                    let replace = parse_replace(raw, lexed, true).map_err(&fail)?;
                    Line::Replace(replace)
                }
                Block::Other => {
                    if first == Some(")") {
                        block = Block::None;
                    }
                    Line::Text(raw.to_string())
                }
                Block::None => {
                    let is_replace = first == Some("replace");
                    let opens = lexed.tokens.len() == 2 && lexed.tokens[1] == "(";
                    if is_replace && opens {
                        block = Block::Replace;
                        Line::BlockOpen(raw.to_string())
                    } else if is_replace {
                        let mut lexed = lexed;
                        lexed.tokens.remove(0);
                        let mut replace = parse_replace(raw, lexed, false).map_err(&fail)?;
                        if matches!(lines.last(), Some(Line::Text(prev)) if prev.is_empty()) {
                            lines.pop();
                            replace.layout.leading_blank = true;
                        }
                        Line::Replace(replace)
                    } else {
                        if opens {
                            block = Block::Other;
                        }
                        Line::Text(raw.to_string())
                    }
                }
            };
            lines.push(line);
        }
    }

    if block != Block::None {
        return Err(HackError::ModFileParseFailed {
            path: path.display().to_string(),
            line: line_count,
            reason: "unterminated block; missing )".to_string(),
        });
    }

    Ok(ModFile {
        path: path.to_path_buf(),
        lines,
        trailing_newline,
    })
}

/// Build a directive from the tokens that follow the `replace` keyword
fn parse_replace(raw: &str, lexed: Lexed, in_block: bool) -> std::result::Result<Replace, String> {
    let tokens = lexed.tokens;
    let arrow = match tokens.iter().position(|t| t == "=>") {
        Some(i @ (1 | 2)) => i,
        _ => return Err(REPLACE_USAGE.to_string()),
    };
    let (old, new) = (&tokens[..arrow], &tokens[arrow + 1..]);
    if new.is_empty() || new.len() > 2 {
        return Err(REPLACE_USAGE.to_string());
    }
    let side = |toks: &[String]| ModuleVersion {
        path: toks[0].clone(),
        version: toks.get(1).cloned().unwrap_or_default(),
    };
    let indent: String = raw.chars().take_while(|c| c.is_whitespace()).collect();

    Ok(Replace {
        old: side(old),
        new: side(new),
        comment: lexed.comment.as_deref().map(SuffixComment::decode),
        layout: Layout {
            in_block,
            indent,
            leading_blank: false,
            raw: Some(raw.to_string()),
        },
    })
}

/// Split a line into tokens, unquoting quoted strings
fn lex(line: &str) -> std::result::Result<Lexed, String> {
    let mut lexed = Lexed::default();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '/' if line[start..].starts_with("//") => {
                lexed.comment = Some(line[start..].trim_end().to_string());
                break;
            }
            '(' | ')' => {
                lexed.tokens.push(c.to_string());
                chars.next();
            }
            '"' => {
                chars.next();
                let mut token = String::new();
                loop {
                    match chars.next() {
                        None => return Err("unterminated quoted string".to_string()),
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => token.push('\n'),
                            Some((_, 't')) => token.push('\t'),
                            Some((_, esc @ ('"' | '\\'))) => token.push(esc),
                            Some((_, other)) => {
                                return Err(format!("unknown escape sequence \\{other}"));
                            }
                            None => return Err("unterminated quoted string".to_string()),
                        },
                        Some((_, ch)) => token.push(ch),
                    }
                }
                lexed.tokens.push(token);
            }
            '`' => {
                chars.next();
                let mut token = String::new();
                loop {
                    match chars.next() {
                        None => return Err("unterminated raw string".to_string()),
                        Some((_, '`')) => break,
                        Some((_, ch)) => token.push(ch),
                    }
                }
                lexed.tokens.push(token);
            }
            _ => {
                let mut token = String::new();
                while let Some(&(pos, ch)) = chars.peek() {
                    if ch.is_whitespace()
                        || matches!(ch, '(' | ')' | '"' | '`')
                        || line[pos..].starts_with("//")
                    {
                        break;
                    }
                    token.push(ch);
                    chars.next();
                }
                lexed.tokens.push(token);
            }
        }
    }
    Ok(lexed)
}
