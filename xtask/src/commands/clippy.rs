use crate::Result;
use crate::utils;

/// Runs Clippy with `clippy::all` and `clippy::pedantic` denied.
///
/// The root crate is linted twice, with all features and without default features,
/// so that both the `std` and the `no_std` builds are covered. Other workspace
/// crates are linted with their default features.
///
/// # Errors
///
/// Returns an error if:
/// - Workspace members cannot be discovered
/// - Cargo clippy command execution fails
/// - Clippy finds any linting violations
pub fn run_clippy() -> Result<()> {
    utils::print_header("Running Clippy with strict linting on all code...");

    for crate_dir in utils::get_workspace_crates()? {
        if crate_dir == utils::ROOT_CRATE {
            clippy_run(&crate_dir, &["--all-targets", "--all-features"], "ntp-wire (all features)")?;
            clippy_run(&crate_dir, &["--no-default-features"], "ntp-wire (no default features)")?;
        } else {
            clippy_run(&crate_dir, &["--all-targets"], &crate_dir)?;
        }
    }

    utils::print_success("✓ All Clippy checks passed!");
    Ok(())
}

fn clippy_run(crate_dir: &str, args: &[&str], name: &str) -> Result<()> {
    utils::print_step("Clippy", name);

    if let Err(err) = utils::run_cargo_clippy(&utils::manifest_path(crate_dir), args) {
        utils::print_error(&format!("✗ Clippy found issues in {name}"));
        return Err(err);
    }

    utils::print_step_success(name);
    Ok(())
}
