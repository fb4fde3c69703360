//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Version string: `INIKIT_VERSION` from the build, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("INIKIT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the inikit version to `out`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "inikit {}", version())?;
    Ok(())
}
