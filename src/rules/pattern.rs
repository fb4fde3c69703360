//! Shortcut syntax: a compiled pattern plus the literal delimiters used to
//! carve the referenced name out of a match.
use regex::Regex;

use crate::error::RuleError;

/// One shortcut kind's syntax.
///
/// `pattern` finds shortcut occurrences in a value. When it has a capture
/// group, group 1 is the shortcut text; otherwise the whole match is. The
/// referenced name is whatever lies between the first `left` delimiter and
/// the next `right` delimiter of that text. Cross-references also carry a
/// `middle` delimiter separating the section from the key.
#[derive(Debug, Clone)]
pub struct ShortcutSyntax {
    pattern: Regex,
    left: String,
    middle: Option<String>,
    right: String,
}

impl ShortcutSyntax {
    /// Compile a shortcut syntax.
    ///
    /// `rule` names the rule in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if `pattern` does not compile.
    pub fn new(
        rule: &'static str,
        pattern: &str,
        left: &str,
        middle: Option<&str>,
        right: &str,
    ) -> Result<Self, RuleError> {
        Ok(Self::from_regex(compile(rule, pattern)?, left, middle, right))
    }

    /// Wrap an already compiled pattern.
    pub(crate) fn from_regex(pattern: Regex, left: &str, middle: Option<&str>, right: &str) -> Self {
        Self {
            pattern,
            left: left.to_string(),
            middle: middle.map(str::to_string),
            right: right.to_string(),
        }
    }

    /// The compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Left delimiter.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Middle (section/key) delimiter, for cross-references.
    #[must_use]
    pub fn middle(&self) -> Option<&str> {
        self.middle.as_deref()
    }

    /// Right delimiter.
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }

    /// Every shortcut occurrence in `value`, left to right.
    #[must_use]
    pub fn occurrences<'v>(&self, value: &'v str) -> Vec<&'v str> {
        self.pattern
            .captures_iter(value)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str())
            .collect()
    }

    /// Extract the referenced name from a shortcut occurrence.
    ///
    /// ```
    /// use inikit::rules::ShortcutSyntax;
    ///
    /// let env = ShortcutSyntax::new("env", r"\$\{env:[^}]*\}", "${env:", None, "}").unwrap();
    /// assert_eq!(env.carve("${env: HOME }"), "HOME");
    /// ```
    #[must_use]
    pub fn carve<'s>(&self, shortcut: &'s str) -> &'s str {
        let start = shortcut
            .find(&self.left)
            .map_or(0, |pos| pos + self.left.len());
        let rest = shortcut.get(start..).unwrap_or_default();
        let inner = rest.find(&self.right).map_or(rest, |end| {
            rest.get(..end).unwrap_or(rest)
        });
        trim_blanks(inner)
    }

    /// Split a carved cross-reference into an optional section and a key.
    ///
    /// Without a middle delimiter (or when it does not occur), the whole
    /// name is the key and the section is `None`.
    #[must_use]
    pub fn split_reference<'s>(&self, name: &'s str) -> (Option<&'s str>, &'s str) {
        let Some(middle) = self.middle.as_deref().filter(|m| !m.is_empty()) else {
            return (None, trim_blanks(name));
        };
        match name.split_once(middle) {
            Some((section, key)) => (Some(trim_blanks(section)), trim_blanks(key)),
            None => (None, trim_blanks(name)),
        }
    }
}

impl PartialEq for ShortcutSyntax {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str()
            && self.left == other.left
            && self.middle == other.middle
            && self.right == other.right
    }
}

impl Eq for ShortcutSyntax {}

/// Compile `pattern`, naming `rule` on failure.
pub(crate) fn compile(rule: &'static str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern { rule, source })
}

/// Trim spaces and tabs only; line terminators never reach this point.
pub(crate) fn trim_blanks(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reference() -> ShortcutSyntax {
        ShortcutSyntax::new(
            "reference",
            r"(\$\{ref:[^}]*\})",
            "${ref:",
            Some("/"),
            "}",
        )
        .expect("valid pattern")
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = ShortcutSyntax::new("env", "(", "${", None, "}").expect_err("must fail");
        assert!(matches!(err, RuleError::InvalidPattern { rule: "env", .. }));
    }

    #[test]
    fn occurrences_use_first_group() {
        let syntax = reference();
        let found = syntax.occurrences("a ${ref:s/k} b ${ref:x}");
        assert_eq!(found, ["${ref:s/k}", "${ref:x}"]);
    }

    #[test]
    fn occurrences_fall_back_to_whole_match() {
        let syntax = ShortcutSyntax::new("env", r"%[A-Z]+%", "%", None, "%").unwrap();
        assert_eq!(syntax.occurrences("%HOME%/%USER%"), ["%HOME%", "%USER%"]);
        assert_eq!(syntax.carve("%HOME%"), "HOME");
    }

    #[test]
    fn carve_trims_blanks() {
        assert_eq!(reference().carve("${ref:  main / path \t}"), "main / path");
    }

    #[test]
    fn split_reference_with_section() {
        let syntax = reference();
        assert_eq!(syntax.split_reference("main / path"), (Some("main"), "path"));
    }

    #[test]
    fn split_reference_without_section() {
        let syntax = reference();
        assert_eq!(syntax.split_reference(" path "), (None, "path"));
    }

    #[test]
    fn split_reference_with_empty_section_means_global() {
        let syntax = reference();
        assert_eq!(syntax.split_reference("/path"), (Some(""), "path"));
    }

    #[test]
    fn equality_compares_pattern_source() {
        assert_eq!(reference(), reference());
        let other = ShortcutSyntax::new("reference", r"\$\{ref:[^}]*\}", "${ref:", Some("/"), "}")
            .unwrap();
        assert_ne!(reference(), other);
    }
}
