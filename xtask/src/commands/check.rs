use crate::Result;
use crate::utils;

/// Runs `cargo check` on every library crate, and on the root crate once more
/// without default features to cover the `no_std` build.
///
/// # Errors
///
/// Returns an error if workspace members cannot be discovered or any check fails.
pub fn check_all() -> Result<()> {
    utils::print_header("Checking workspace crates...");

    for crate_dir in utils::get_workspace_crates()? {
        check_crate(&crate_dir, &[], &crate_dir)?;
    }

    check_crate(
        utils::ROOT_CRATE,
        &["--no-default-features"],
        "ntp-wire (no default features)",
    )?;

    utils::print_success("✓ All checks passed!");
    Ok(())
}

fn check_crate(crate_dir: &str, args: &[&str], name: &str) -> Result<()> {
    utils::print_step("Checking", name);

    utils::run_cargo_check(&utils::manifest_path(crate_dir), args)?;

    utils::print_step_success(name);
    Ok(())
}
