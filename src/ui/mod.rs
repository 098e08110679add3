//! User-facing output
//!
//! Results go to stdout unadorned so they can be piped. Diagnostics go to
//! stderr, styled with `console`.

use console::Style;

/// Print an error
pub fn error(message: impl std::fmt::Display) {
    eprintln!("{}", Style::new().red().apply_to(message));
}

/// Print a warning that does not fail the command
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{}", Style::new().yellow().apply_to(message));
}

/// Print progress information
pub fn note(message: impl std::fmt::Display) {
    eprintln!("{}", Style::new().dim().apply_to(message));
}

/// Print a result line
pub fn result(message: impl std::fmt::Display) {
    println!("{message}");
}

/// Format a `module => directory` line
pub fn replacement_line(module_path: &str, dir: &str) -> String {
    format!("{module_path} => {dir}")
}
