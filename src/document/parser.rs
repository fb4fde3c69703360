//! Turns text into sections, driven by a [`Rules`] dialect.
//!
//! Parsing never fails. Lines that are neither a section header, a comment
//! nor a key/value pair are dropped, and a repeated key overwrites the
//! previous one in place.
use tracing::{debug, trace, warn};

use super::entry::Entry;
use super::line_reader::{LineEnding, LineReader};
use super::section::Section;
use crate::rules::Rules;
use crate::rules::pattern::trim_blanks;

/// Result of parsing a whole text.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub sections: Vec<Section>,
    pub line_ending: LineEnding,
}

/// Parse `text` into sections. The global section is always the first one.
pub(crate) fn parse(text: &str, rules: &Rules) -> Parsed {
    let mut reader = LineReader::new(text.chars());
    let mut parser = Parser::new(rules);
    for line in reader.by_ref() {
        parser.feed(&line);
    }
    let sections = parser.finish();
    let line_ending = reader.inferred_line_ending();
    debug!(
        target: "inikit::parser",
        "parsed {} section(s), line ending {line_ending}",
        sections.len()
    );
    Parsed {
        sections,
        line_ending,
    }
}

/// A multi-line value still waiting for its last fragment.
#[derive(Debug)]
struct Pending {
    key: String,
    fragments: Vec<String>,
}

#[derive(Debug)]
struct Parser<'r> {
    rules: &'r Rules,
    sections: Vec<Section>,
    current: usize,
    pending: Option<Pending>,
    line_number: usize,
}

impl<'r> Parser<'r> {
    fn new(rules: &'r Rules) -> Self {
        Self {
            rules,
            sections: vec![Section::new("")],
            current: 0,
            pending: None,
            line_number: 0,
        }
    }

    fn feed(&mut self, raw: &str) {
        self.line_number += 1;
        let line = trim_blanks(raw);

        if let Some(mut pending) = self.pending.take() {
            pending.fragments.push(line.to_string());
            if line.ends_with(self.rules.line_concat()) {
                self.pending = Some(pending);
            } else {
                self.store_concat(pending);
            }
            return;
        }

        if let Some(name) = section_name(line, self.rules) {
            self.enter_section(name);
        } else if line.is_empty() || starts_with_any(line, self.rules.comment_starts()) {
            self.with_current(|section| section.push_comment(Entry::comment(line)));
        } else if let Some((key, value)) = split_key_value(line, self.rules) {
            if self.rules.features().line_continuation && value.ends_with(self.rules.line_concat())
            {
                self.pending = Some(Pending {
                    key: key.to_string(),
                    fragments: vec![value.to_string()],
                });
            } else {
                self.with_current(|section| section.insert(key, Entry::value(value)));
            }
        } else {
            trace!(
                target: "inikit::parser",
                "dropping line {}: no key/value separator in {line:?}",
                self.line_number
            );
        }
    }

    fn finish(mut self) -> Vec<Section> {
        if let Some(pending) = self.pending.take() {
            warn!(
                target: "inikit::parser",
                "input ended inside the multi-line value of '{}'",
                pending.key
            );
            self.store_concat(pending);
        }
        self.sections
    }

    fn enter_section(&mut self, name: &str) {
        if let Some(index) = self.sections.iter().position(|s| s.name() == name) {
            self.current = index;
        } else {
            self.sections.push(Section::new(name));
            self.current = self.sections.len() - 1;
        }
    }

    fn store_concat(&mut self, pending: Pending) {
        let entry = Entry::concat(&pending.fragments);
        self.with_current(|section| section.insert(&pending.key, entry));
    }

    fn with_current(&mut self, f: impl FnOnce(&mut Section)) {
        if let Some(section) = self.sections.get_mut(self.current) {
            f(section);
        }
    }
}

fn starts_with_any(line: &str, symbols: &[String]) -> bool {
    symbols.iter().any(|s| line.starts_with(s.as_str()))
}

/// Section name declared by `line`, if it is a section header.
///
/// A header is longer than two characters, starts with a section opener and
/// ends with a section closer. The name lies between the leftmost opener and
/// the rightmost closer and must not be blank.
pub(crate) fn section_name<'l>(line: &'l str, rules: &Rules) -> Option<&'l str> {
    if line.chars().count() <= 2
        || !starts_with_any(line, rules.section_starts())
        || !rules.section_ends().iter().any(|s| line.ends_with(s.as_str()))
    {
        return None;
    }
    let start = rules
        .section_starts()
        .iter()
        .filter_map(|s| line.find(s.as_str()).map(|pos| pos + s.len()))
        .min()?;
    let end = rules
        .section_ends()
        .iter()
        .filter_map(|s| line.rfind(s.as_str()))
        .max()?;
    let name = trim_blanks(line.get(start..end)?);
    (!name.is_empty()).then_some(name)
}

/// Split `line` at the leftmost key/value separator.
pub(crate) fn split_key_value<'l>(line: &'l str, rules: &Rules) -> Option<(&'l str, &'l str)> {
    let (pos, symbol) = rules
        .affectations()
        .iter()
        .filter_map(|s| line.find(s.as_str()).map(|pos| (pos, s)))
        .min_by_key(|(pos, _)| *pos)?;
    let key = line.get(..pos)?;
    let value = line.get(pos + symbol.len()..)?;
    Some((trim_blanks(key), trim_blanks(value)))
}
