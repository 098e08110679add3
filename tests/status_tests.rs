//! `gohack status`

#![cfg(unix)]

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_status_lists_directory_replacements() {
    let ws = TestWorkspace::new(
        "module example.com/main\n\n\
         replace example.com/a => /somewhere/a\n\
         replace example.com/b => example.com/bfork v1.0.0\n\
         replace example.com/c => ../c\n",
    );
    ws.gohack()
        .arg("status")
        .assert()
        .success()
        .stdout("example.com/a => /somewhere/a\nexample.com/c => ../c\n");
}

#[test]
fn test_status_nothing_hacked() {
    let ws = TestWorkspace::new("module example.com/main\n");
    ws.gohack().arg("status").assert().success().stdout("");
}

#[test]
fn test_status_unknown_module() {
    let ws = TestWorkspace::new("module example.com/main\n\nreplace example.com/a => /somewhere/a\n");
    ws.gohack()
        .args(["status", "example.com/zzz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not replaced by a directory"));
}

#[test]
fn test_status_verbose_shows_checkout_state() {
    let mut ws = TestWorkspace::new("module example.com/main\n");
    ws.add_module("example.com/dep", "v1.0.0", &[("dep.go", "package dep\n")]);
    let dir = ws.checkout_dir("example.com/dep");
    ws.gohack().args(["get", "example.com/dep"]).assert().success();

    ws.gohack()
        .args(["status", "-v"])
        .assert()
        .success()
        .stdout(format!("example.com/dep => {} (clean)\n", dir.display()));

    std::fs::write(dir.join("dep.go"), "package dep // edit\n").unwrap();
    ws.gohack()
        .args(["status", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("(modified)\n"));
}
