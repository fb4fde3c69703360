//! Subcommand implementations.
//!
//! Every command takes the shared [`GlobalOpts`], its own options, a [`Log`]
//! for progress and diagnostics, and the writer that receives its output.
pub mod check;
pub mod dump;
pub mod fmt;
pub mod get;
pub mod remove;
pub mod set;
pub mod version;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::document::{Document, LineEnding, TextEncoding};
use crate::logging::Log;
use crate::lookup;
use crate::rules::Rules;
use crate::rules::toml_loader;

/// Shared state produced by the common command setup sequence.
///
/// Loads the rule set, parses the encoding and applies `-D` property
/// definitions so that each command does not have to repeat the boilerplate.
#[derive(Debug, Clone)]
pub struct CommandSetup {
    /// Rules every document is parsed and resolved with.
    pub rules: Rules,
    /// Encoding documents are read and written in.
    pub encoding: TextEncoding,
}

impl CommandSetup {
    /// Load the rules, parse the encoding and define the requested
    /// properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule file cannot be loaded, the encoding is
    /// unknown, or a property definition is not of the form `name=value`.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let rules = match &global.rules {
            Some(path) => {
                log.debug(&format!("rules: {}", path.display()));
                toml_loader::load_rules(path)
                    .with_context(|| format!("failed to load rules from {}", path.display()))?
            }
            None => Rules::default(),
        };

        let encoding: TextEncoding = global.encoding.parse()?;
        log.debug(&format!("encoding: {encoding}"));

        for definition in &global.define {
            let (name, value) = parse_definition(definition)?;
            lookup::set_property(name, value);
            log.debug(&format!("property {name} = {value}"));
        }

        Ok(Self { rules, encoding })
    }

    /// Read the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(&self, path: &Path) -> Result<Document> {
        let mut document = Document::new(self.rules.clone());
        document
            .load_path(path, self.encoding)
            .with_context(|| format!("failed to load {}", path.display()))?;
        Ok(document)
    }

    /// Read the document at `path`, or start an empty one if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or decoded.
    pub fn load_or_new(&self, path: &Path) -> Result<Document> {
        if path.exists() {
            self.load(path)
        } else {
            Ok(Document::new(self.rules.clone()))
        }
    }

    /// Write `document` to `path`. `None` keeps the inferred line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if a character cannot be encoded or the file cannot
    /// be written.
    pub fn store(
        &self,
        document: &Document,
        path: &Path,
        line_ending: Option<LineEnding>,
    ) -> Result<()> {
        document
            .store_path(path, self.encoding, line_ending)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Split a `-D name=value` definition.
///
/// # Errors
///
/// Returns an error if there is no `=` or the name is empty.
pub fn parse_definition(definition: &str) -> Result<(&str, &str)> {
    match definition.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => anyhow::bail!("invalid property definition '{definition}', expected name=value"),
    }
}

/// Display form of a section name in messages.
const fn section_label(section: &str) -> &str {
    if section.is_empty() { "<global>" } else { section }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::MockLog;

    pub(super) fn quiet_log() -> MockLog {
        let mut log = MockLog::new();
        log.expect_stage().return_const(());
        log.expect_info().return_const(());
        log.expect_debug().return_const(());
        log.expect_warn().return_const(());
        log.expect_error().return_const(());
        log
    }

    #[test]
    fn definitions_split_on_first_equals() {
        assert_eq!(parse_definition("a.b=c=d").unwrap(), ("a.b", "c=d"));
        assert_eq!(parse_definition("flag=").unwrap(), ("flag", ""));
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        assert!(parse_definition("novalue").is_err());
        assert!(parse_definition("=x").is_err());
    }

    #[test]
    fn setup_defaults_to_utf8_and_default_rules() {
        let setup = CommandSetup::init(&GlobalOpts::default(), &quiet_log()).unwrap();
        assert_eq!(setup.encoding, TextEncoding::Utf8);
        assert_eq!(setup.rules, Rules::default());
    }

    #[test]
    fn setup_rejects_unknown_encoding() {
        let global = GlobalOpts {
            encoding: "klingon".to_string(),
            ..GlobalOpts::default()
        };
        assert!(CommandSetup::init(&global, &quiet_log()).is_err());
    }

    #[test]
    fn setup_reports_missing_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            rules: Some(dir.path().join("absent.toml")),
            ..GlobalOpts::default()
        };
        let err = CommandSetup::init(&global, &quiet_log()).unwrap_err();
        assert!(err.to_string().contains("failed to load rules"));
    }

    #[test]
    fn setup_loads_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[symbols]\naffectations = [\":\"]\n").unwrap();
        let global = GlobalOpts {
            rules: Some(path),
            ..GlobalOpts::default()
        };
        let setup = CommandSetup::init(&global, &quiet_log()).unwrap();
        assert_eq!(setup.rules.affectation(), ":");
    }

    #[test]
    fn setup_defines_properties() {
        let global = GlobalOpts {
            define: vec!["inikit.test.setup=on".to_string()],
            ..GlobalOpts::default()
        };
        CommandSetup::init(&global, &quiet_log()).unwrap();
        assert_eq!(lookup::property("inikit.test.setup").as_deref(), Some("on"));
        lookup::remove_property("inikit.test.setup");
    }

    #[test]
    fn load_or_new_starts_empty_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let setup = CommandSetup::init(&GlobalOpts::default(), &quiet_log()).unwrap();
        let document = setup.load_or_new(&dir.path().join("new.ini")).unwrap();
        assert_eq!(document.section_names(), [""]);
        assert!(document.key_names("").is_empty());
    }

    #[test]
    fn section_labels_name_the_global_section() {
        assert_eq!(section_label(""), "<global>");
        assert_eq!(section_label("db"), "db");
    }
}
