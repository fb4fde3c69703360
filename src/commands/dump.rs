//! Command: print resolved values.
use std::io::Write;

use anyhow::{Result, bail};
use serde::Serialize;

use super::{CommandSetup, section_label};
use crate::cli::{DumpOpts, GlobalOpts};
use crate::document::Document;
use crate::logging::Log;

#[derive(Debug, Serialize)]
struct SectionDump<'d> {
    section: &'d str,
    values: Vec<ValueDump>,
}

#[derive(Debug, Serialize)]
struct ValueDump {
    key: String,
    value: String,
}

/// Print every resolved value, or those of `--section`, either as
/// single-line INI text or as JSON.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the section does not
/// exist, or a value cannot be resolved.
pub fn run(
    global: &GlobalOpts,
    opts: &DumpOpts,
    log: &dyn Log,
    out: &mut impl Write,
) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let document = setup.load(&opts.file)?;

    let names: Vec<&str> = match &opts.section {
        Some(name) if !document.has_section(name) => {
            bail!("section '{}' not found in {}", section_label(name), opts.file.display())
        }
        Some(name) => vec![name.as_str()],
        None => document.section_names(),
    };
    let dumps = collect(&document, &names)?;

    if opts.json {
        serde_json::to_writer_pretty(&mut *out, &dumps)?;
        writeln!(out)?;
        return Ok(());
    }

    let rules = document.rules();
    let (start, end, affectation) = (
        rules.section_start(),
        rules.section_end(),
        rules.affectation(),
    );
    for dump in &dumps {
        if !dump.section.is_empty() {
            writeln!(out, "{start}{}{end}", dump.section)?;
        }
        for ValueDump { key, value } in &dump.values {
            writeln!(out, "{key}{affectation}{}", value.replace(['\r', '\n'], " "))?;
        }
    }
    Ok(())
}

fn collect<'d>(document: &Document, names: &[&'d str]) -> Result<Vec<SectionDump<'d>>> {
    names
        .iter()
        .map(|&section| {
            let values = document
                .section_values(section)?
                .into_iter()
                .map(|(key, value)| ValueDump { key, value })
                .collect();
            Ok(SectionDump { section, values })
        })
        .collect()
}
