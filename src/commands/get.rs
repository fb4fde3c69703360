//! Command: print one value.
use std::io::Write;

use anyhow::{Result, bail};

use super::{CommandSetup, section_label};
use crate::cli::{GetOpts, GlobalOpts};
use crate::logging::Log;

/// Print the value of `opts.key` to `out`.
///
/// The value is resolved unless `--raw` is given. An absent or blank value
/// falls back to `--default`.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the value cannot be
/// resolved, or the value is missing and no default was given.
pub fn run(
    global: &GlobalOpts,
    opts: &GetOpts,
    log: &dyn Log,
    out: &mut impl Write,
) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let document = setup.load(&opts.file)?;

    let found = if opts.raw {
        document
            .entry(&opts.section, &opts.key)
            .map(|entry| entry.joined(document.rules().line_concat()))
    } else {
        document.find_value(&opts.section, &opts.key)?
    };

    let value = match (found, &opts.default) {
        (Some(value), _) => value,
        (None, Some(default)) => {
            log.debug(&format!("{} not set, using default", opts.key));
            default.clone()
        }
        (None, None) => bail!(
            "no value for key '{}' in section '{}' of {}",
            opts.key,
            section_label(&opts.section),
            opts.file.display()
        ),
    };
    writeln!(out, "{value}")?;
    Ok(())
}
