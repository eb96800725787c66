use crate::Result;
use crate::utils;

pub fn check_formatting() -> Result<()> {
    utils::print_header("Checking code formatting for the workspace...");

    utils::run_cargo_fmt_check()?;

    utils::print_success("✓ All formatting checks passed!");
    Ok(())
}

pub fn fix_formatting() -> Result<()> {
    utils::print_header("Fixing code formatting for the workspace...");

    utils::run_cargo_fmt_fix()?;

    utils::print_success("✓ All formatting issues fixed!");
    Ok(())
}
