//! # xtask - Build Automation for ntp-wire
//!
//! Build, test, lint and format the `ntp-wire` workspace following the
//! [xtask pattern](https://github.com/matklad/cargo-xtask).
//!
//! ```rust,no_run
//! use xtask::{commands, Result};
//!
//! fn main() -> Result<()> {
//!     commands::build::build_crates(true, false)?;
//!     commands::test::run_tests()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - All build automation commands (build, test, check, etc.)
//! - [`utils`] - Cargo invocation, workspace discovery and output formatting

/// Build automation commands for the `ntp-wire` workspace
pub mod commands;

/// Utility functions and helpers
pub mod utils;

// Re-export commonly used types and functions
pub use anyhow::{Context, Result};
pub use colored::Colorize;
