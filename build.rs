//! Build script for distgit-review - embeds version information.
//!
//! Produces `BUILD_INFO_HUMAN`, shown by `--version`: the Cargo.toml version
//! plus `git describe` output when a git checkout is available.

use std::process::Command;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Executes a git command and returns the trimmed stdout as a String.
fn git_command(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn build_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match git_command(&["describe", "--tags", "--always", "--dirty"]) {
        Some(describe) => format!("{version} ({describe})"),
        None => version.to_string(),
    }
}
