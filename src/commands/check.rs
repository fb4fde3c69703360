//! Command: resolve every value of a document.
use anyhow::{Result, bail};

use super::{CommandSetup, section_label};
use crate::cli::{CheckOpts, GlobalOpts};
use crate::logging::Log;

/// Resolve every value of the document, logging each failure.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or at least one value
/// fails to resolve.
pub fn run(global: &GlobalOpts, opts: &CheckOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    log.stage(&format!("Checking {}", opts.file.display()));
    let document = setup.load(&opts.file)?;
    let resolver = document.resolver();

    let mut checked = 0_usize;
    let mut failures = 0_usize;
    for section in document.sections() {
        for key in section.keys() {
            checked += 1;
            match resolver.resolve("", section.name(), key) {
                Ok(value) => log.debug(&format!(
                    "[{}] {key} = {value}",
                    section_label(section.name())
                )),
                Err(e) => {
                    failures += 1;
                    log.error(&format!("[{}] {key}: {e}", section_label(section.name())));
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {checked} value(s) failed to resolve");
    }
    log.info(&format!("{checked} value(s) resolved"));
    Ok(())
}
