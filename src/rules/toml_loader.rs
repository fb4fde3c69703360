//! TOML rule files layered over the built-in dialect.
//!
//! Every field is optional; absent fields keep the built-in value. Unknown
//! fields are rejected so typos do not silently fall back to defaults.
//!
//! ```toml
//! max_shortcut_depth = 10
//!
//! [features]
//! line_continuation = false
//!
//! [symbols]
//! affectations = ["=", ":"]
//!
//! [shortcuts.reference]
//! pattern = '(\$\{ref:[^}]*\})'
//! left = "${ref:"
//! middle = "::"
//! right = "}"
//! ```
use serde::Deserialize;
use std::path::Path;

use super::{Rules, ShortcutKind, ShortcutSyntax};
use crate::error::RuleError;

/// Raw shape of a rule file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesFile {
    default_value: Option<String>,
    max_shortcut_depth: Option<u32>,
    line_concat: Option<String>,
    features: FeaturesSection,
    symbols: SymbolsSection,
    shortcuts: ShortcutsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FeaturesSection {
    env_shortcuts: Option<bool>,
    property_shortcuts: Option<bool>,
    reference_shortcuts: Option<bool>,
    unicode_escapes: Option<bool>,
    line_continuation: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SymbolsSection {
    section_starts: Option<Vec<String>>,
    section_ends: Option<Vec<String>>,
    comment_starts: Option<Vec<String>>,
    affectations: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ShortcutsSection {
    env: Option<ShortcutEntry>,
    property: Option<ShortcutEntry>,
    reference: Option<ShortcutEntry>,
    any: Option<AnyEntry>,
}

/// A shortcut syntax override. Omitted delimiters keep the current ones.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShortcutEntry {
    pattern: String,
    left: Option<String>,
    middle: Option<String>,
    right: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnyEntry {
    pattern: String,
}

/// Load a rule file and layer it over [`Rules::default`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, has
/// unknown fields, or describes invalid rules.
pub fn load_rules(path: &Path) -> Result<Rules, RuleError> {
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_rules(&content, &path.display().to_string())
}

/// Parse rule-file content and layer it over [`Rules::default`].
///
/// # Examples
///
/// ```
/// use inikit::rules::toml_loader::rules_from_str;
///
/// let rules = rules_from_str("[symbols]\naffectations = [\":\", \"=\"]\n").unwrap();
/// assert_eq!(rules.affectation(), ":");
/// ```
///
/// # Errors
///
/// Returns an error if the content is not valid TOML, has unknown fields, or
/// describes invalid rules.
pub fn rules_from_str(content: &str) -> Result<Rules, RuleError> {
    parse_rules(content, "<string>")
}

fn parse_rules(content: &str, origin: &str) -> Result<Rules, RuleError> {
    let file: RulesFile = toml::from_str(content).map_err(|source| RuleError::Parse {
        path: origin.to_string(),
        source,
    })?;
    let mut rules = Rules::default();
    apply(&mut rules, file)?;
    Ok(rules)
}

fn apply(rules: &mut Rules, file: RulesFile) -> Result<(), RuleError> {
    if let Some(value) = file.default_value {
        rules.set_default_value(&value);
    }
    if let Some(depth) = file.max_shortcut_depth {
        rules.set_max_shortcut_depth(depth)?;
    }
    if let Some(marker) = file.line_concat {
        rules.set_line_concat(&marker)?;
    }

    let mut features = rules.features();
    let f = file.features;
    features.env_shortcuts = f.env_shortcuts.unwrap_or(features.env_shortcuts);
    features.property_shortcuts = f.property_shortcuts.unwrap_or(features.property_shortcuts);
    features.reference_shortcuts = f
        .reference_shortcuts
        .unwrap_or(features.reference_shortcuts);
    features.unicode_escapes = f.unicode_escapes.unwrap_or(features.unicode_escapes);
    features.line_continuation = f.line_continuation.unwrap_or(features.line_continuation);
    rules.set_features(features);

    let s = file.symbols;
    if let Some(symbols) = s.section_starts {
        rules.set_section_starts(symbols.as_slice())?;
    }
    if let Some(symbols) = s.section_ends {
        rules.set_section_ends(symbols.as_slice())?;
    }
    if let Some(symbols) = s.comment_starts {
        rules.set_comment_starts(symbols.as_slice())?;
    }
    if let Some(symbols) = s.affectations {
        rules.set_affectations(symbols.as_slice())?;
    }

    let shortcuts = file.shortcuts;
    for (kind, entry) in [
        (ShortcutKind::Environment, shortcuts.env),
        (ShortcutKind::Property, shortcuts.property),
        (ShortcutKind::Reference, shortcuts.reference),
    ] {
        if let Some(entry) = entry {
            let syntax = override_syntax(rules.shortcut(kind), kind, &entry)?;
            rules.set_shortcut(kind, syntax);
        }
    }
    if let Some(any) = shortcuts.any {
        rules.set_any_shortcut(&any.pattern)?;
    }
    Ok(())
}

fn override_syntax(
    current: &ShortcutSyntax,
    kind: ShortcutKind,
    entry: &ShortcutEntry,
) -> Result<ShortcutSyntax, RuleError> {
    let middle = entry.middle.as_deref().or_else(|| current.middle());
    ShortcutSyntax::new(
        kind.rule_name(),
        &entry.pattern,
        entry.left.as_deref().unwrap_or_else(|| current.left()),
        middle,
        entry.right.as_deref().unwrap_or_else(|| current.right()),
    )
}
