//! External command execution
//!
//! Every VCS and `go` invocation goes through [`Runner`]. Commands that change
//! a working copy are dispatched with [`Runner::run_mutating`], which is the one
//! place where dry-run mode swaps execution for an echo of the command line.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use crate::error::{HackError, Result};

/// Runs external programs and optionally echoes them to stderr
#[derive(Debug, Default)]
pub struct Runner {
    /// Echo every command before running it (`-x`)
    echo: bool,

    /// Print mutating commands instead of running them (`-n`)
    dry_run: bool,

    /// Directory of the last echoed `cd`, so consecutive commands in the
    /// same directory share one `cd` line
    echoed_dir: Mutex<Option<PathBuf>>,
}

impl Runner {
    pub fn new(echo: bool, dry_run: bool) -> Self {
        Self {
            echo,
            dry_run,
            echoed_dir: Mutex::new(None),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run a command that only reads state, returning its stdout.
    pub fn run(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<String> {
        if self.echo {
            self.echo_command(dir, program, args, &mut std::io::stderr().lock());
        }
        execute(dir, program, args)
    }

    /// Run a command that modifies a working copy.
    ///
    /// In dry-run mode the command is echoed and reported as successful with
    /// empty output.
    pub fn run_mutating(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<String> {
        if self.dry_run {
            self.echo_command(dir, program, args, &mut std::io::stderr().lock());
            return Ok(String::new());
        }
        self.run(dir, program, args)
    }

    fn echo_command(&self, dir: Option<&Path>, program: &str, args: &[&str], out: &mut dyn Write) {
        let mut echoed = match self.echoed_dir.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(dir) = dir {
            if echoed.as_deref() != Some(dir) {
                let _ = writeln!(out, "cd {}", shquote(&dir.to_string_lossy()));
                *echoed = Some(dir.to_path_buf());
            }
        }
        let _ = writeln!(out, "{}", command_line(program, args));
    }
}

fn execute(dir: Option<&Path>, program: &str, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| HackError::CommandNotStarted {
        command: command_line(program, args),
        reason: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let message = if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    };
    Err(HackError::CommandFailed {
        command: command_line(program, args),
        message,
    })
}

/// Render a command as a shell command line with quoted arguments
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&shquote(arg));
    }
    line
}

/// Quote a string for a POSIX shell.
///
/// A single quote becomes `'"'"'`: close the quote, a double-quoted single
/// quote, reopen.
pub fn shquote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r#"'"'"'"#))
}
