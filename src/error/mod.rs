//! Error types and handling for gohack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by the area that raises them:
//! - module resolution and replacement bookkeeping
//! - checkout synchronization (copy and VCS mode)
//! - process execution
//! - manifest (`go.mod`) reading and writing
//! - file system

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gohack operations
#[derive(Error, Diagnostic, Debug)]
pub enum HackError {
    // Module errors
    #[error("module {path:?} does not appear to be in use")]
    #[diagnostic(
        code(gohack::module::not_in_use),
        help("Check the module path against `go list -m all`")
    )]
    ModuleNotInUse { path: String },

    #[error("{path} is the main module; there is nothing to hack")]
    #[diagnostic(code(gohack::module::main_module))]
    MainModule { path: String },

    #[error("no local source code found for {path}")]
    #[diagnostic(
        code(gohack::module::no_local_source),
        help("Run `go mod download` first, or use --vcs to check out from version control")
    )]
    NoLocalSource { path: String },

    #[error("cannot list modules: {reason}")]
    #[diagnostic(code(gohack::module::list_failed))]
    ModuleListFailed { reason: String },

    #[error("duplicate module {path:?} in go list output")]
    #[diagnostic(code(gohack::module::duplicate))]
    DuplicateModule { path: String },

    #[error("module {path} has no version to check out")]
    #[diagnostic(code(gohack::module::no_version))]
    NoVersion { path: String },

    #[error("malformed pseudo-version {version:?}")]
    #[diagnostic(code(gohack::module::invalid_pseudo_version))]
    InvalidPseudoVersion { version: String },

    // Replacement errors
    #[error("{path} is already replaced by {target}")]
    #[diagnostic(
        code(gohack::replace::already_replaced),
        help("Remove the existing replace directive from go.mod first")
    )]
    AlreadyReplaced { path: String, target: String },

    #[error("{path:?} is already replaced by {dir:?} - are you already gohacking it?")]
    #[diagnostic(code(gohack::replace::already_hacking))]
    AlreadyHacking { path: String, dir: String },

    #[error("found multiple existing replacements for {path:?}")]
    #[diagnostic(
        code(gohack::replace::multiple),
        help("Edit go.mod so that at most one replace directive refers to the module")
    )]
    MultipleReplacements { path: String },

    #[error("{path} not currently replaced; cannot drop")]
    #[diagnostic(code(gohack::replace::not_replaced))]
    NotReplaced { path: String },

    #[error("{path} is not replaced by a directory")]
    #[diagnostic(code(gohack::replace::not_hacked))]
    NotHacked { path: String },

    #[error("all modules failed; not replacing anything")]
    #[diagnostic(code(gohack::replace::nothing_replaced))]
    NothingReplaced,

    // Checkout errors
    #[error("{dir:?} already exists; not overwriting")]
    #[diagnostic(
        code(gohack::checkout::not_overwriting),
        help("The directory was not created by gohack; move it away or use -f")
    )]
    NotOverwriting { dir: String },

    #[error("{dir:?} is not clean; not overwriting")]
    #[diagnostic(
        code(gohack::checkout::not_clean),
        help("Local changes would be lost; commit or move them, or use -f")
    )]
    NotClean { dir: String },

    #[error("{dir:?} is not managed by gohack; not removing")]
    #[diagnostic(code(gohack::checkout::unmanaged))]
    Unmanaged { dir: String },

    #[error("cannot determine cache directory: {reason}")]
    #[diagnostic(
        code(gohack::checkout::cache_root),
        help("Set the GOHACK environment variable")
    )]
    CacheRootUnavailable { reason: String },

    // VCS errors
    #[error("cannot find repository root for {path}: {reason}")]
    #[diagnostic(code(gohack::vcs::unknown_root))]
    UnknownRepositoryRoot { path: String, reason: String },

    #[error("cannot {operation} {dir}: {reason}")]
    #[diagnostic(code(gohack::vcs::operation_failed))]
    VcsOperationFailed {
        operation: String,
        dir: String,
        reason: String,
    },

    #[error("{command} has unexpected output {output:?}")]
    #[diagnostic(code(gohack::vcs::unexpected_output))]
    UnexpectedVcsOutput { command: String, output: String },

    // Process errors
    #[error("{command}: {message}")]
    #[diagnostic(code(gohack::exec::failed))]
    CommandFailed { command: String, message: String },

    #[error("cannot run {command}: {reason}")]
    #[diagnostic(
        code(gohack::exec::not_started),
        help("Check that the program is installed and on PATH")
    )]
    CommandNotStarted { command: String, reason: String },

    #[error("unknown shell {shell:?}")]
    #[diagnostic(
        code(gohack::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    // Manifest errors
    #[error("no go.mod file found in {dir} or any parent directory")]
    #[diagnostic(code(gohack::modfile::not_found))]
    ModFileNotFound { dir: String },

    #[error("{path}:{line}: {reason}")]
    #[diagnostic(code(gohack::modfile::parse_failed))]
    ModFileParseFailed {
        path: String,
        line: usize,
        reason: String,
    },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(gohack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(gohack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(gohack::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for HackError {
    fn from(err: std::io::Error) -> Self {
        HackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HackError {
    fn from(err: serde_json::Error) -> Self {
        HackError::ModuleListFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, HackError>;
