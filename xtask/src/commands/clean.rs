use crate::Result;
use crate::utils;

/// Cleans the shared workspace target directory.
///
/// # Errors
///
/// Returns an error if the cargo clean command cannot be executed.
pub fn clean_all() -> Result<()> {
    utils::print_header("Cleaning all build artifacts...");

    utils::run_cargo_clean()?;

    utils::print_success("✓ All build artifacts cleaned!");
    Ok(())
}
