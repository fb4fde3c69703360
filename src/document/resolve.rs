//! Value resolution: Unicode escapes and shortcut expansion.
//!
//! Resolving a value goes through these steps:
//!
//! 1. fetch the stored text (joining multi-line values),
//! 2. decode `\uXXXX` escapes when enabled,
//! 3. expand environment, property and cross-reference shortcuts, in that
//!    order, for every enabled kind.
//!
//! Cross-references resolve the referenced entry recursively. Each level
//! increments a depth counter; passing the rule set's maximum depth is
//! reported as a probable reference cycle. Results are never cached.
use tracing::trace;

use super::Document;
use super::escape::decode_unicode;
use crate::error::ResolveError;
use crate::lookup::{Lookup, ProcessEnv, ProcessProperties};
use crate::rules::{Rules, ShortcutKind};

/// Resolves values of one document against a rule set and two lookup
/// sources.
///
/// Built by [`Document::resolver`] (document rules, process environment and
/// process properties) or [`Document::resolver_with`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use inikit::document::Document;
///
/// let doc = Document::from_text("home = ${env:HOME}/app\n");
/// let env = HashMap::from([("HOME".to_string(), "/home/ada".to_string())]);
/// let props: HashMap<String, String> = HashMap::new();
/// let resolver = doc.resolver_with(doc.rules(), &env, &props);
/// assert_eq!(resolver.resolve("", "", "home").unwrap(), "/home/ada/app");
/// ```
#[derive(Clone, Copy)]
pub struct Resolver<'d> {
    document: &'d Document,
    rules: &'d Rules,
    env: &'d dyn Lookup,
    properties: &'d dyn Lookup,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("sections", &self.document.section_names().len())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<'d> Resolver<'d> {
    /// Resolver using the process environment and property registry.
    #[must_use]
    pub const fn new(document: &'d Document, rules: &'d Rules) -> Self {
        Self::with_sources(document, rules, &ProcessEnv, &ProcessProperties)
    }

    /// Resolver using the given lookup sources.
    #[must_use]
    pub const fn with_sources(
        document: &'d Document,
        rules: &'d Rules,
        env: &'d dyn Lookup,
        properties: &'d dyn Lookup,
    ) -> Self {
        Self {
            document,
            rules,
            env,
            properties,
        }
    }

    /// Fully resolved value, or `default` when the key is absent or the
    /// result is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn resolve(&self, default: &str, section: &str, key: &str) -> Result<String, ResolveError> {
        self.resolve_at(0, Some(default), section, key, false)
            .map(Option::unwrap_or_default)
    }

    /// Value with escapes decoded but shortcuts left as written.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedEscape`] on a malformed escape.
    pub fn resolve_unexpanded(
        &self,
        default: &str,
        section: &str,
        key: &str,
    ) -> Result<String, ResolveError> {
        self.resolve_at(0, Some(default), section, key, true)
            .map(Option::unwrap_or_default)
    }

    /// Fully resolved value, or `None` when the key is absent or the result
    /// is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a malformed escape or a reference cycle.
    pub fn find(&self, section: &str, key: &str) -> Result<Option<String>, ResolveError> {
        self.resolve_at(0, None, section, key, false)
    }

    fn resolve_at(
        &self,
        depth: u32,
        default: Option<&str>,
        section: &str,
        key: &str,
        raw: bool,
    ) -> Result<Option<String>, ResolveError> {
        if depth > self.rules.max_shortcut_depth() {
            return Err(ResolveError::CycleDetected {
                section: section.to_string(),
                key: key.to_string(),
            });
        }
        let fallback = || default.map(str::to_string);

        let Some(entry) = self.document.entry(section, key) else {
            return Ok(fallback());
        };
        let mut value = entry.joined(self.rules.line_concat());
        if self.rules.features().unicode_escapes {
            value = decode_unicode(&value)?;
        }
        if is_blank(&value) {
            return Ok(fallback());
        }

        if !raw && self.rules.any_shortcut().is_match(&value) {
            for kind in ShortcutKind::ALL {
                if self.rules.shortcut_enabled(kind) {
                    value = self.expand(kind, value, depth, default, section)?;
                }
            }
            if is_blank(&value) {
                return Ok(fallback());
            }
        }
        Ok(Some(value))
    }

    /// Replace every `kind` shortcut of `value`. Substituted text is never
    /// scanned again.
    fn expand(
        &self,
        kind: ShortcutKind,
        mut value: String,
        depth: u32,
        default: Option<&str>,
        section: &str,
    ) -> Result<String, ResolveError> {
        let syntax = self.rules.shortcut(kind);
        let count = syntax.occurrences(&value).len();
        let mut cursor = 0;
        for _ in 0..count {
            let Some((start, end)) = syntax
                .pattern()
                .captures_at(&value, cursor)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| (m.start(), m.end()))
            else {
                break;
            };
            let shortcut = value.get(start..end).unwrap_or_default();
            let name = syntax.carve(shortcut);
            let replacement = match kind {
                ShortcutKind::Environment => self.env.lookup(name).unwrap_or_default(),
                ShortcutKind::Property => self.properties.lookup(name).unwrap_or_default(),
                ShortcutKind::Reference => {
                    let (target_section, target_key) = syntax.split_reference(name);
                    let target_section = target_section.unwrap_or(section);
                    self.resolve_at(depth + 1, default, target_section, target_key, false)?
                        .unwrap_or_default()
                }
            };
            trace!(
                target: "inikit::resolve",
                "{shortcut} -> {replacement:?} (depth {depth})"
            );
            value.replace_range(start..end, &replacement);
            cursor = start + replacement.len();
        }
        Ok(value)
    }
}

fn is_blank(value: &str) -> bool {
    value.chars().all(|c| c == ' ' || c == '\t')
}
