use crate::Result;
use crate::utils;

/// Builds every library crate of the workspace with optional feature flags.
///
/// # Arguments
///
/// * `all_features` - If true, builds with all features enabled
/// * `no_default_features` - If true, builds with no default features
///
/// # Errors
///
/// Returns an error if:
/// - Both `all_features` and `no_default_features` are true (conflicting flags)
/// - Workspace members cannot be discovered
/// - Any build returns a non-zero exit code
pub fn build_crates(all_features: bool, no_default_features: bool) -> Result<()> {
    if all_features && no_default_features {
        utils::print_error("✗ Cannot specify both --all-features and --no-default-features");
        anyhow::bail!("Conflicting feature flags");
    }

    let mut message = "Building workspace crates".to_string();
    let mut args = Vec::new();

    if all_features {
        message.push_str(" (with all features)");
        args.push("--all-features");
    } else if no_default_features {
        message.push_str(" (with no default features)");
        args.push("--no-default-features");
    }

    message.push_str("...");
    utils::print_header(&message);

    for crate_dir in utils::get_workspace_crates()? {
        utils::print_step("Building", &crate_dir);

        if let Err(err) = utils::run_cargo_build(&utils::manifest_path(&crate_dir), &args) {
            utils::print_step_error(&format!("✗ Failed to build {crate_dir}"));
            return Err(err);
        }

        utils::print_step_success(&crate_dir);
    }

    utils::print_success("✓ All crates built successfully!");
    Ok(())
}
