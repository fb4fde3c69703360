//! Command: rewrite a document in canonical layout.
use anyhow::{Result, anyhow};

use super::CommandSetup;
use crate::cli::{FmtOpts, GlobalOpts};
use crate::document::LineEnding;
use crate::logging::Log;

/// Reformat a document: canonical symbols, trimmed names and values,
/// aligned continuation lines. Optionally sorts and changes line endings.
///
/// # Errors
///
/// Returns an error if the line ending is unknown or the document cannot be
/// loaded or written.
pub fn run(global: &GlobalOpts, opts: &FmtOpts, log: &dyn Log) -> Result<()> {
    let line_ending = opts
        .line_ending
        .as_deref()
        .map(str::parse::<LineEnding>)
        .transpose()
        .map_err(|e| anyhow!(e))?;

    let setup = CommandSetup::init(global, log)?;
    let mut document = setup.load(&opts.file)?;
    log.debug(&format!("inferred line ending: {}", document.line_ending()));

    if opts.sort {
        document.sort();
    }

    let target = opts.output.as_ref().unwrap_or(&opts.file);
    setup.store(&document, target, line_ending)?;
    log.info(&format!("formatted {}", target.display()));
    Ok(())
}
