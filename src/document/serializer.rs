//! Turns sections back into text.
//!
//! Headers and separators use the canonical (first) symbol of each rule list;
//! comment lines are written back as they were read. Multi-line values keep
//! one fragment per line, the continuation lines indented to start under the
//! value's first character.
use std::fmt::Write as _;

use super::line_reader::LineEnding;
use super::section::{Line, Section};
use crate::rules::Rules;

/// Render `sections` with one uniform line ending.
pub(crate) fn render(sections: &[Section], rules: &Rules, line_ending: LineEnding) -> String {
    let eol = line_ending.as_str();
    let mut out = String::new();
    for section in sections {
        if !section.is_global() {
            let _ = write!(
                out,
                "{}{}{}{eol}",
                rules.section_start(),
                section.name(),
                rules.section_end()
            );
        }
        for line in section.lines() {
            match line {
                Line::Comment(entry) => {
                    out.push_str(entry.text());
                    out.push_str(eol);
                }
                Line::KeyValue(key, entry) => {
                    render_key_value(&mut out, key, entry.fragments(), rules.affectation(), eol);
                }
            }
        }
    }
    out
}

fn render_key_value<'e>(
    out: &mut String,
    key: &str,
    mut fragments: impl Iterator<Item = &'e str>,
    affectation: &str,
    eol: &str,
) {
    out.push_str(key);
    out.push_str(affectation);
    out.push_str(fragments.next().unwrap_or_default());
    out.push_str(eol);

    let indent = " ".repeat(affectation.chars().count() + key.chars().count());
    for fragment in fragments {
        out.push_str(&indent);
        out.push_str(fragment);
        out.push_str(eol);
    }
}
