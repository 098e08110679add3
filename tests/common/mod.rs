//! Common test utilities for gohack integration tests
//!
//! A [`TestWorkspace`] holds a main module, a fake module download cache and
//! a gohack cache root, all inside one temporary directory. `go` is replaced
//! by a shell script on `PATH` that prints a canned `go list -m -json` listing.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub const MAIN_MODULE: &str = "example.com/main";

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,

    /// Directory of the main module
    pub main: PathBuf,

    /// Cache root passed through `$GOHACK`
    pub cache: PathBuf,

    /// Directory holding the fake `go` executable
    bin: PathBuf,

    /// Extra modules reported by the fake `go list`
    modules: Vec<String>,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a workspace whose main module has the given `go.mod`
    pub fn new(go_mod: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let main = temp.path().join("main");
        let cache = temp.path().join("gohack");
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(&main).expect("Failed to create main module");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");
        std::fs::write(main.join("go.mod"), go_mod).expect("Failed to write go.mod");

        let ws = Self {
            temp,
            main,
            cache,
            bin,
            modules: Vec::new(),
        };
        ws.write_listing();
        ws
    }

    /// Add a downloaded module with the given files to the fake module cache
    pub fn add_module(&mut self, path: &str, version: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self
            .temp
            .path()
            .join("modcache")
            .join(format!("{path}@{version}"));
        for (name, content) in files {
            let file = dir.join(name);
            std::fs::create_dir_all(file.parent().expect("file has a parent"))
                .expect("Failed to create module directory");
            std::fs::write(&file, content).expect("Failed to write module file");
        }
        self.modules.push(format!(
            r#"{{"Path": "{path}", "Version": "{version}", "Dir": "{}"}}"#,
            dir.display()
        ));
        self.write_listing();
        dir
    }

    /// Write the listing and the `go` script that prints it
    fn write_listing(&self) {
        let listing = self.temp.path().join("listing.json");
        let mut content = format!(
            r#"{{"Path": "{MAIN_MODULE}", "Main": true, "Dir": "{}"}}"#,
            self.main.display()
        );
        for module in &self.modules {
            content.push('\n');
            content.push_str(module);
        }
        content.push('\n');
        std::fs::write(&listing, content).expect("Failed to write listing");

        let script = self.bin.join("go");
        std::fs::write(
            &script,
            format!("#!/bin/sh\ncat '{}'\n", listing.display()),
        )
        .expect("Failed to write fake go");
        make_executable(&script);
    }

    /// A gohack command running in the main module
    pub fn gohack(&self) -> Command {
        let mut cmd = gohack_cmd();
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut dirs = vec![self.bin.clone()];
        dirs.extend(std::env::split_paths(&path));
        cmd.current_dir(&self.main)
            .env("GOHACK", &self.cache)
            .env("PATH", std::env::join_paths(dirs).expect("valid PATH"))
            .env("NO_COLOR", "1");
        cmd
    }

    /// Where a copy-mode checkout of `module_path` ends up
    pub fn checkout_dir(&self, module_path: &str) -> PathBuf {
        module_path
            .split('/')
            .fold(self.cache.clone(), |dir, elem| dir.join(elem))
    }

    pub fn go_mod(&self) -> String {
        self.read(&self.main.join("go.mod"))
    }

    pub fn write_go_mod(&self, content: &str) {
        std::fs::write(self.main.join("go.mod"), content).expect("Failed to write go.mod");
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("Failed to read file")
    }
}

/// The gohack binary under test
#[allow(deprecated)]
pub fn gohack_cmd() -> Command {
    Command::cargo_bin("gohack").expect("gohack binary is built")
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
