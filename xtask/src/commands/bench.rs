use crate::Result;
use crate::utils;

/// Runs the criterion benchmarks of the root crate.
///
/// # Errors
///
/// Returns an error if the benchmarks fail to build or run.
pub fn run_benches() -> Result<()> {
    utils::print_header("Running ntp-wire benchmarks...");

    utils::run_cargo_bench(&utils::manifest_path(utils::ROOT_CRATE))?;

    utils::print_success("✓ Benchmarks finished!");
    Ok(())
}
