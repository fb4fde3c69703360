//! The in-memory document: ordered sections of comments and key/value
//! entries, plus the operations to load, query, edit and store it.
//!
//! ```
//! use inikit::document::Document;
//!
//! let mut doc = Document::from_text("[server]\nhost = example.org\nurl = http://${ref:host}/\n");
//! assert_eq!(doc.value("server", "url").unwrap(), "http://example.org/");
//!
//! doc.set_value("server", "port", "8080").unwrap();
//! assert!(doc.store_string(None).ends_with("port=8080\n"));
//! ```
//!
//! The global section (empty name) holds keys declared before any header.
//! It always exists and always comes first.
pub mod encoding;
pub mod entry;
pub mod escape;
pub mod line_reader;
mod parser;
pub mod resolve;
pub mod section;
mod serializer;

use std::cmp::Ordering;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DocumentError, Field, ResolveError};
use crate::lookup::Lookup;
use crate::rules::{RuleRegistry, Rules};

pub use encoding::TextEncoding;
pub use entry::Entry;
pub use line_reader::{LineEnding, LineReader};
pub use resolve::Resolver;
pub use section::{Line, Section};

/// An INI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
    rules: Rules,
    line_ending: LineEnding,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Document {
    /// An empty document owning `rules`.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            sections: vec![Section::new("")],
            rules,
            line_ending: LineEnding::platform(),
        }
    }

    /// An empty document using a snapshot of the registry's rules.
    #[must_use]
    pub fn from_registry(registry: &RuleRegistry) -> Self {
        Self::new(registry.snapshot())
    }

    /// Parse `text` with the built-in rules.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::default();
        doc.load_str(text);
        doc
    }

    /// Rules used by this document.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Replace this document's rules with a copy of `rules`.
    pub fn set_rules(&mut self, rules: &Rules) {
        self.rules = rules.clone();
    }

    /// Line ending inferred by the last load (platform default before any).
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Sections in order, the global section first.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section named `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name() == name)
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Replace the content with the parse of `reader`, decoded as `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Stream`] if reading fails and
    /// [`DocumentError::Decode`] if the bytes are not valid in `encoding`.
    pub fn load<R: Read>(&mut self, mut reader: R, encoding: TextEncoding) -> Result<(), DocumentError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = encoding.decode(&bytes)?;
        self.load_str(&text);
        Ok(())
    }

    /// Replace the content with the parse of `text`.
    pub fn load_str(&mut self, text: &str) {
        let parsed = parser::parse(text, &self.rules);
        self.sections = parsed.sections;
        self.line_ending = parsed.line_ending;
    }

    /// Replace the content with the parse of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the file cannot be read and
    /// [`DocumentError::Decode`] if its bytes are not valid in `encoding`.
    pub fn load_path(&mut self, path: &Path, encoding: TextEncoding) -> Result<(), DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(target: "inikit::parser", "loading {} ({encoding})", path.display());
        let text = encoding.decode(&bytes)?;
        self.load_str(&text);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Store
    // -----------------------------------------------------------------------

    /// Render the document. `None` uses the inferred line ending.
    #[must_use]
    pub fn store_string(&self, line_ending: Option<LineEnding>) -> String {
        let line_ending = line_ending.unwrap_or(self.line_ending);
        let text = serializer::render(&self.sections, &self.rules, line_ending);
        debug!(
            target: "inikit::store",
            "rendered {} section(s), {} bytes, line ending {line_ending}",
            self.sections.len(),
            text.len()
        );
        text
    }

    /// Write the document to `writer` in `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Unmappable`] if a character cannot be encoded
    /// and [`DocumentError::Stream`] if writing fails.
    pub fn store<W: Write>(
        &self,
        mut writer: W,
        encoding: TextEncoding,
        line_ending: Option<LineEnding>,
    ) -> Result<(), DocumentError> {
        let bytes = encoding.encode(&self.store_string(line_ending))?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the document to the file at `path`, replacing it.
    ///
    /// The text is staged in a sibling temporary file and renamed into place,
    /// so a failed write never leaves `path` truncated.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Unmappable`] if a character cannot be encoded
    /// and [`DocumentError::Io`] if the file cannot be written.
    pub fn store_path(
        &self,
        path: &Path,
        encoding: TextEncoding,
        line_ending: Option<LineEnding>,
    ) -> Result<(), DocumentError> {
        let bytes = encoding.encode(&self.store_string(line_ending))?;
        let tmp = staging_path(path);
        let io_error = |source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        };
        let cleanup = || {
            let _ = std::fs::remove_file(&tmp);
        };

        if let Err(e) = std::fs::write(&tmp, bytes) {
            cleanup();
            return Err(io_error(e));
        }
        if let Err(e) = std::fs::rename(&tmp, path) {
            cleanup();
            return Err(io_error(e));
        }
        debug!(target: "inikit::store", "stored {} ({encoding})", path.display());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Resolver over this document with its own rules, the process
    /// environment and the process properties.
    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self, &self.rules)
    }

    /// Resolver over this document with explicit rules and lookup sources.
    #[must_use]
    pub const fn resolver_with<'d>(
        &'d self,
        rules: &'d Rules,
        env: &'d dyn Lookup,
        properties: &'d dyn Lookup,
    ) -> Resolver<'d> {
        Resolver::with_sources(self, rules, env, properties)
    }

    /// Resolved value, falling back to the rules' default value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn value(&self, section: &str, key: &str) -> Result<String, ResolveError> {
        self.resolver()
            .resolve(self.rules.default_value(), section, key)
    }

    /// Resolved value, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn value_or(&self, default: &str, section: &str, key: &str) -> Result<String, ResolveError> {
        self.resolver().resolve(default, section, key)
    }

    /// Resolved value under another rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn value_with(
        &self,
        default: &str,
        section: &str,
        key: &str,
        rules: &Rules,
    ) -> Result<String, ResolveError> {
        Resolver::new(self, rules).resolve(default, section, key)
    }

    /// Resolved value, or `None` when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn find_value(&self, section: &str, key: &str) -> Result<Option<String>, ResolveError> {
        self.resolver().find(section, key)
    }

    /// Value with escapes decoded and shortcuts left as written.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedEscape`] on a malformed escape.
    pub fn value_unexpanded(
        &self,
        default: &str,
        section: &str,
        key: &str,
    ) -> Result<String, ResolveError> {
        self.resolver().resolve_unexpanded(default, section, key)
    }

    /// Stored text of a value, exactly as held in memory.
    #[must_use]
    pub fn raw_value(&self, section: &str, key: &str) -> Option<&str> {
        self.entry(section, key).map(Entry::text)
    }

    /// Stored entry of a key.
    #[must_use]
    pub fn entry(&self, section: &str, key: &str) -> Option<&Entry> {
        self.section(section)?.get(key)
    }

    /// Resolved `(key, value)` pairs of a section, in order. Missing values
    /// resolve to the empty string.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] met.
    pub fn section_values(&self, section: &str) -> Result<Vec<(String, String)>, ResolveError> {
        let resolver = self.resolver();
        self.key_names(section)
            .into_iter()
            .map(|key| Ok((key.to_string(), resolver.resolve("", section, key)?)))
            .collect()
    }

    /// Resolve every value with this document's rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] met.
    pub fn check_content(&self) -> Result<(), ResolveError> {
        self.check_content_with(&self.rules)
    }

    /// Resolve every value under `rules`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] met.
    pub fn check_content_with(&self, rules: &Rules) -> Result<(), ResolveError> {
        let resolver = Resolver::new(self, rules);
        for section in &self.sections {
            for key in section.keys() {
                resolver.resolve("", section.name(), key)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Section names in order, the global section (`""`) included.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(Section::name).collect()
    }

    /// Key names of a section in order; empty for a missing section.
    #[must_use]
    pub fn key_names(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|s| s.keys().collect())
            .unwrap_or_default()
    }

    /// Whether the section exists.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Whether the key exists in the section.
    #[must_use]
    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.entry(section, key).is_some()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Store `value` under `section`/`key`, creating either as needed.
    ///
    /// An existing key keeps its position; a multi-line value becomes a
    /// single-line one.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidArgument`] if any argument contains a
    /// line terminator. The document is left untouched.
    pub fn set_value(&mut self, section: &str, key: &str, value: &str) -> Result<(), DocumentError> {
        for (field, text) in [(Field::Section, section), (Field::Key, key), (Field::Value, value)] {
            if text.contains(['\r', '\n']) {
                return Err(DocumentError::InvalidArgument {
                    field,
                    value: text.to_string(),
                });
            }
        }
        if let Some(entry) = self.section_mut(section).and_then(|s| s.get_mut(key)) {
            entry.set_text(value);
            return Ok(());
        }
        if let Some(target) = self.section_mut(section) {
            target.insert(key, Entry::value(value));
            return Ok(());
        }
        let mut created = Section::new(section);
        created.insert(key, Entry::value(value));
        if created.is_global() {
            self.sections.insert(0, created);
        } else {
            self.sections.push(created);
        }
        Ok(())
    }

    /// Copy every value of `other` into this document, overwriting existing
    /// keys. Comments are not copied.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidArgument`] if a name or value of
    /// `other` contains a line terminator. Multi-line values are copied
    /// joined.
    pub fn add_all(&mut self, other: &Self) -> Result<(), DocumentError> {
        for section in &other.sections {
            for line in section.lines() {
                if let Line::KeyValue(key, entry) = line {
                    let text = entry.joined(other.rules.line_concat());
                    self.set_value(section.name(), key, &text)?;
                }
            }
        }
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        self.section_mut(section)
            .and_then(|s| s.remove(key))
            .is_some()
    }

    /// Remove a section's content and, if `remove_declaration`, the section
    /// itself. The global section is only ever emptied. Returns whether the
    /// section existed.
    pub fn remove_section(&mut self, section: &str, remove_declaration: bool) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.name() == section) else {
            return false;
        };
        if remove_declaration && !section.is_empty() {
            self.sections.remove(index);
        } else if let Some(target) = self.sections.get_mut(index) {
            *target = Section::new(section);
        }
        true
    }

    /// Rename a key in place. Returns `false`, changing nothing, if `from`
    /// is absent or `to` already exists.
    pub fn rename_key(&mut self, section: &str, from: &str, to: &str) -> bool {
        self.section_mut(section)
            .is_some_and(|s| s.rename(from, to))
    }

    /// Rename a section in place. Returns `false`, changing nothing, if
    /// `from` is absent, `to` already exists, or either is the global
    /// section.
    pub fn rename_section(&mut self, from: &str, to: &str) -> bool {
        if from.is_empty() || to.is_empty() || self.has_section(to) {
            return false;
        }
        match self.section_mut(from) {
            Some(section) => {
                section.set_name(to);
                true
            }
            None => false,
        }
    }

    /// Drop every comment and sort sections and keys case-insensitively
    /// (ties broken by byte order). The global section stays first.
    pub fn sort(&mut self) {
        self.sort_with(natural_order, natural_order);
    }

    /// Like [`sort`](Self::sort) with one comparator for sections and keys.
    pub fn sort_by<F>(&mut self, cmp: F)
    where
        F: Fn(&str, &str) -> Ordering,
    {
        self.sort_with(&cmp, &cmp);
    }

    /// Like [`sort`](Self::sort) with separate comparators.
    pub fn sort_with<S, K>(&mut self, section_cmp: S, key_cmp: K)
    where
        S: Fn(&str, &str) -> Ordering,
        K: Fn(&str, &str) -> Ordering,
    {
        for section in &mut self.sections {
            section.sort_keys_by(&key_cmp);
        }
        self.sections.sort_by(|a, b| match (a.is_global(), b.is_global()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => section_cmp(a.name(), b.name()),
        });
    }
}

/// Case-insensitive order, ties broken by byte order.
fn natural_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sibling of `path` used to stage a write; same directory keeps the rename
/// on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".inikit_tmp");
    PathBuf::from(name)
}
