use crate::{Context, Result};
use std::process::Command;

fn run_cargo(subcommand: &str, manifest_path: &str, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args([subcommand, "--manifest-path", manifest_path])
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute cargo {subcommand} for {manifest_path}"))?;

    if !status.success() {
        anyhow::bail!("cargo {subcommand} failed for {manifest_path}");
    }

    Ok(())
}

pub fn run_cargo_build(manifest_path: &str, args: &[&str]) -> Result<()> {
    run_cargo("build", manifest_path, args)
}

pub fn run_cargo_test(manifest_path: &str, args: &[&str]) -> Result<()> {
    run_cargo("test", manifest_path, args)
}

pub fn run_cargo_check(manifest_path: &str, args: &[&str]) -> Result<()> {
    run_cargo("check", manifest_path, args)
}

pub fn run_cargo_bench(manifest_path: &str) -> Result<()> {
    run_cargo("bench", manifest_path, &[])
}

pub fn run_cargo_clippy(manifest_path: &str, args: &[&str]) -> Result<()> {
    let mut lint_args = args.to_vec();
    lint_args.extend_from_slice(&["--", "-D", "clippy::all", "-D", "clippy::pedantic"]);

    run_cargo("clippy", manifest_path, &lint_args)
}

pub fn run_cargo_fmt_check() -> Result<()> {
    let status = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .status()
        .context("Failed to execute cargo fmt --check")?;

    if !status.success() {
        anyhow::bail!("Format check failed");
    }

    Ok(())
}

pub fn run_cargo_fmt_fix() -> Result<()> {
    let status = Command::new("cargo")
        .args(["fmt", "--all"])
        .status()
        .context("Failed to execute cargo fmt")?;

    if !status.success() {
        anyhow::bail!("Format fix failed");
    }

    Ok(())
}

pub fn run_cargo_clean() -> Result<()> {
    Command::new("cargo")
        .args(["clean"])
        .output()
        .context("Failed to execute cargo clean")?;

    Ok(())
}
