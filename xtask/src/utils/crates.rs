use crate::Result;
use std::fs;
use std::path::Path;

/// Directory of the root package, listed first in [`get_workspace_crates`].
pub const ROOT_CRATE: &str = ".";
/// Workspace member that is tooling rather than a library.
const XTASK_CRATE: &str = "xtask";

/// Retrieves the library crates of the workspace.
///
/// Reads `workspace.members` from the root `Cargo.toml`, expanding glob patterns, and
/// returns the root package directory followed by the sorted member directories.
/// The `xtask` member itself is left out.
///
/// # Errors
/// This function may return an error in the following scenarios:
/// - The `Cargo.toml` file is missing or cannot be read.
/// - The `workspace.members` field is missing or improperly formatted.
/// - Errors occur while expanding glob patterns in the `workspace.members` field.
pub fn get_workspace_crates() -> Result<Vec<String>> {
    let cargo_toml_path = Path::new(ROOT_CRATE).join("Cargo.toml");

    let content = fs::read_to_string(cargo_toml_path)?;
    let workspace: toml::Value = toml::from_str(&content)?;

    let members = workspace
        .get("workspace")
        .and_then(|ws| ws.get("members"))
        .and_then(|m| m.as_array())
        .ok_or_else(|| anyhow::anyhow!("Failed to parse workspace members from Cargo.toml"))?;

    let mut crates = Vec::new();
    for member in members.iter().filter_map(toml::Value::as_str) {
        if member.contains('*') {
            for entry in glob::glob(member)?.flatten() {
                if let Some(name) = entry.to_str() {
                    crates.push(name.to_string());
                }
            }
        } else {
            crates.push(member.to_string());
        }
    }

    crates.retain(|name| name != XTASK_CRATE);
    crates.sort();
    crates.insert(0, ROOT_CRATE.to_string());

    Ok(crates)
}

/// Manifest path of a crate directory returned by [`get_workspace_crates`].
#[must_use]
pub fn manifest_path(crate_dir: &str) -> String {
    format!("{crate_dir}/Cargo.toml")
}
