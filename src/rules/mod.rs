//! Syntax rules and tunables driving the parser, the resolver and the
//! serializer.
//!
//! A [`Rules`] value describes one INI dialect: which symbols open and close
//! section headers, start comments and separate keys from values, which
//! marker continues a value on the next line, and how shortcuts are written.
//! [`Rules::default`] returns a fresh copy of the built-in dialect; rule files
//! layer overrides on top of it (see [`toml_loader`]).
pub mod pattern;
pub mod registry;
pub mod toml_loader;

use regex::Regex;

use crate::error::RuleError;

pub use pattern::ShortcutSyntax;
pub use registry::RuleRegistry;

/// Built-in default value returned for missing keys.
pub const DEFAULT_VALUE: &str = "";
/// Built-in maximum shortcut recursion depth.
pub const DEFAULT_MAX_SHORTCUT_DEPTH: u32 = 20;
/// Largest accepted shortcut recursion depth. Deeper chains would exhaust
/// the stack before the cycle could be reported.
pub const MAX_SHORTCUT_DEPTH_LIMIT: u32 = 256;
/// Built-in line continuation marker.
pub const DEFAULT_LINE_CONCAT: &str = "\\";
/// Built-in environment shortcut pattern (`${env:NAME}`).
pub const DEFAULT_ENV_PATTERN: &str = r"(\$\{env:[^}]*\})";
/// Built-in property shortcut pattern (`${sys:NAME}`).
pub const DEFAULT_PROPERTY_PATTERN: &str = r"(\$\{sys:[^}]*\})";
/// Built-in cross-reference pattern (`${ref:SECTION/KEY}`).
pub const DEFAULT_REFERENCE_PATTERN: &str = r"(\$\{ref:[^}]*\})";
/// Built-in detector for any shortcut kind.
pub const DEFAULT_ANY_PATTERN: &str = r"\$\{(?:env|sys|ref):[^}]*\}";

/// The three kinds of shortcut a value may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    /// `${env:NAME}`: process environment variable.
    Environment,
    /// `${sys:NAME}`: process property.
    Property,
    /// `${ref:SECTION/KEY}`: another entry of the same document.
    Reference,
}

impl ShortcutKind {
    /// Expansion order used by the resolver.
    pub const ALL: [Self; 3] = [Self::Environment, Self::Property, Self::Reference];

    /// Rule name used in errors and rule files.
    #[must_use]
    pub const fn rule_name(self) -> &'static str {
        match self {
            Self::Environment => "shortcuts.env",
            Self::Property => "shortcuts.property",
            Self::Reference => "shortcuts.reference",
        }
    }
}

/// Feature switches of a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// Expand `${env:...}` shortcuts on read.
    pub env_shortcuts: bool,
    /// Expand `${sys:...}` shortcuts on read.
    pub property_shortcuts: bool,
    /// Expand `${ref:...}` shortcuts on read.
    pub reference_shortcuts: bool,
    /// Decode `\uXXXX` escapes on read.
    pub unicode_escapes: bool,
    /// Join values ending with the continuation marker with the next lines.
    pub line_continuation: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            env_shortcuts: true,
            property_shortcuts: true,
            reference_shortcuts: true,
            unicode_escapes: true,
            line_continuation: true,
        }
    }
}

/// One INI dialect.
///
/// Symbol lists accept any member when reading; the first member is the one
/// written by the serializer.
///
/// # Examples
///
/// ```
/// use inikit::rules::Rules;
///
/// let mut rules = Rules::default();
/// rules.enable_line_continuation(false);
/// rules.set_affectations(&["=", ":"]).unwrap();
/// assert_eq!(rules.affectation(), "=");
/// assert!(!rules.features().line_continuation);
/// ```
#[derive(Debug, Clone)]
pub struct Rules {
    default_value: String,
    max_shortcut_depth: u32,
    line_concat: String,
    features: Features,
    section_starts: Vec<String>,
    section_ends: Vec<String>,
    comment_starts: Vec<String>,
    affectations: Vec<String>,
    env: ShortcutSyntax,
    property: ShortcutSyntax,
    reference: ShortcutSyntax,
    any_shortcut: Regex,
}

impl Default for Rules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PartialEq for Rules {
    fn eq(&self, other: &Self) -> bool {
        self.default_value == other.default_value
            && self.max_shortcut_depth == other.max_shortcut_depth
            && self.line_concat == other.line_concat
            && self.features == other.features
            && self.section_starts == other.section_starts
            && self.section_ends == other.section_ends
            && self.comment_starts == other.comment_starts
            && self.affectations == other.affectations
            && self.env == other.env
            && self.property == other.property
            && self.reference == other.reference
            && self.any_shortcut.as_str() == other.any_shortcut.as_str()
    }
}

impl Eq for Rules {}

impl Rules {
    /// The built-in dialect.
    fn builtin() -> Self {
        Self {
            default_value: DEFAULT_VALUE.to_string(),
            max_shortcut_depth: DEFAULT_MAX_SHORTCUT_DEPTH,
            line_concat: DEFAULT_LINE_CONCAT.to_string(),
            features: Features::default(),
            section_starts: vec!["[".to_string()],
            section_ends: vec!["]".to_string()],
            comment_starts: vec![";".to_string(), "#".to_string()],
            affectations: vec!["=".to_string()],
            env: builtin_syntax(
                DEFAULT_ENV_PATTERN,
                "${env:",
                None,
            ),
            property: builtin_syntax(
                DEFAULT_PROPERTY_PATTERN,
                "${sys:",
                None,
            ),
            reference: builtin_syntax(
                DEFAULT_REFERENCE_PATTERN,
                "${ref:",
                Some("/"),
            ),
            any_shortcut: builtin_regex(DEFAULT_ANY_PATTERN),
        }
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    /// Value returned for missing keys when the caller gives no default.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Set the value returned for missing keys.
    pub fn set_default_value(&mut self, value: &str) -> &mut Self {
        value.clone_into(&mut self.default_value);
        self
    }

    /// Maximum shortcut recursion depth before a cycle is reported.
    #[must_use]
    pub const fn max_shortcut_depth(&self) -> u32 {
        self.max_shortcut_depth
    }

    /// Set the maximum shortcut recursion depth.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DepthTooLarge`] if `depth` exceeds
    /// [`MAX_SHORTCUT_DEPTH_LIMIT`].
    pub const fn set_max_shortcut_depth(&mut self, depth: u32) -> Result<&mut Self, RuleError> {
        if depth > MAX_SHORTCUT_DEPTH_LIMIT {
            return Err(RuleError::DepthTooLarge {
                depth,
                limit: MAX_SHORTCUT_DEPTH_LIMIT,
            });
        }
        self.max_shortcut_depth = depth;
        Ok(self)
    }

    /// Line continuation marker.
    #[must_use]
    pub fn line_concat(&self) -> &str {
        &self.line_concat
    }

    /// Set the line continuation marker.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptySymbols`] if `marker` is blank.
    pub fn set_line_concat(&mut self, marker: &str) -> Result<&mut Self, RuleError> {
        let marker = pattern::trim_blanks(marker);
        if marker.is_empty() {
            return Err(RuleError::EmptySymbols { rule: "line_concat" });
        }
        marker.clone_into(&mut self.line_concat);
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Feature switches
    // -----------------------------------------------------------------------

    /// Current feature switches.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Replace all feature switches at once.
    pub const fn set_features(&mut self, features: Features) -> &mut Self {
        self.features = features;
        self
    }

    /// Toggle `${env:...}` expansion.
    pub const fn enable_env_shortcuts(&mut self, enable: bool) -> &mut Self {
        self.features.env_shortcuts = enable;
        self
    }

    /// Toggle `${sys:...}` expansion.
    pub const fn enable_property_shortcuts(&mut self, enable: bool) -> &mut Self {
        self.features.property_shortcuts = enable;
        self
    }

    /// Toggle `${ref:...}` expansion.
    pub const fn enable_reference_shortcuts(&mut self, enable: bool) -> &mut Self {
        self.features.reference_shortcuts = enable;
        self
    }

    /// Toggle `\uXXXX` decoding.
    pub const fn enable_unicode_escapes(&mut self, enable: bool) -> &mut Self {
        self.features.unicode_escapes = enable;
        self
    }

    /// Toggle multi-line value parsing.
    pub const fn enable_line_continuation(&mut self, enable: bool) -> &mut Self {
        self.features.line_continuation = enable;
        self
    }

    /// Whether expansion of `kind` is switched on.
    #[must_use]
    pub const fn shortcut_enabled(&self, kind: ShortcutKind) -> bool {
        match kind {
            ShortcutKind::Environment => self.features.env_shortcuts,
            ShortcutKind::Property => self.features.property_shortcuts,
            ShortcutKind::Reference => self.features.reference_shortcuts,
        }
    }

    // -----------------------------------------------------------------------
    // Symbol lists
    // -----------------------------------------------------------------------

    /// Symbols accepted as section header openers.
    #[must_use]
    pub fn section_starts(&self) -> &[String] {
        &self.section_starts
    }

    /// Symbols accepted as section header closers.
    #[must_use]
    pub fn section_ends(&self) -> &[String] {
        &self.section_ends
    }

    /// Symbols that start a comment line.
    #[must_use]
    pub fn comment_starts(&self) -> &[String] {
        &self.comment_starts
    }

    /// Symbols separating a key from its value.
    #[must_use]
    pub fn affectations(&self) -> &[String] {
        &self.affectations
    }

    /// Canonical section opener used when writing.
    #[must_use]
    pub fn section_start(&self) -> &str {
        first(&self.section_starts)
    }

    /// Canonical section closer used when writing.
    #[must_use]
    pub fn section_end(&self) -> &str {
        first(&self.section_ends)
    }

    /// Canonical key/value separator used when writing.
    #[must_use]
    pub fn affectation(&self) -> &str {
        first(&self.affectations)
    }

    /// Replace the section header openers.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptySymbols`] if no non-blank symbol remains.
    pub fn set_section_starts<S: AsRef<str>>(&mut self, symbols: &[S]) -> Result<&mut Self, RuleError> {
        self.section_starts = symbol_list("symbols.section_starts", symbols)?;
        Ok(self)
    }

    /// Replace the section header closers.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptySymbols`] if no non-blank symbol remains.
    pub fn set_section_ends<S: AsRef<str>>(&mut self, symbols: &[S]) -> Result<&mut Self, RuleError> {
        self.section_ends = symbol_list("symbols.section_ends", symbols)?;
        Ok(self)
    }

    /// Replace the comment markers.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptySymbols`] if no non-blank symbol remains.
    pub fn set_comment_starts<S: AsRef<str>>(&mut self, symbols: &[S]) -> Result<&mut Self, RuleError> {
        self.comment_starts = symbol_list("symbols.comment_starts", symbols)?;
        Ok(self)
    }

    /// Replace the key/value separators.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptySymbols`] if no non-blank symbol remains.
    pub fn set_affectations<S: AsRef<str>>(&mut self, symbols: &[S]) -> Result<&mut Self, RuleError> {
        self.affectations = symbol_list("symbols.affectations", symbols)?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Shortcut syntax
    // -----------------------------------------------------------------------

    /// Syntax of one shortcut kind.
    #[must_use]
    pub const fn shortcut(&self, kind: ShortcutKind) -> &ShortcutSyntax {
        match kind {
            ShortcutKind::Environment => &self.env,
            ShortcutKind::Property => &self.property,
            ShortcutKind::Reference => &self.reference,
        }
    }

    /// Replace the syntax of one shortcut kind.
    pub fn set_shortcut(&mut self, kind: ShortcutKind, syntax: ShortcutSyntax) -> &mut Self {
        match kind {
            ShortcutKind::Environment => self.env = syntax,
            ShortcutKind::Property => self.property = syntax,
            ShortcutKind::Reference => self.reference = syntax,
        }
        self
    }

    /// Detector matching any shortcut kind.
    #[must_use]
    pub const fn any_shortcut(&self) -> &Regex {
        &self.any_shortcut
    }

    /// Replace the "any shortcut" detector.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if `pattern` does not compile.
    pub fn set_any_shortcut(&mut self, pattern: &str) -> Result<&mut Self, RuleError> {
        self.any_shortcut = pattern::compile("shortcuts.any", pattern)?;
        Ok(self)
    }
}

fn first(symbols: &[String]) -> &str {
    symbols.first().map_or("", String::as_str)
}

/// Trim every member, drop blank ones, and require at least one survivor.
fn symbol_list<S: AsRef<str>>(rule: &'static str, symbols: &[S]) -> Result<Vec<String>, RuleError> {
    let list: Vec<String> = symbols
        .iter()
        .map(|s| pattern::trim_blanks(s.as_ref()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        return Err(RuleError::EmptySymbols { rule });
    }
    Ok(list)
}

fn builtin_syntax(source: &str, left: &str, middle: Option<&str>) -> ShortcutSyntax {
    ShortcutSyntax::from_regex(builtin_regex(source), left, middle, "}")
}

/// Compile one of the built-in pattern literals.
#[allow(clippy::expect_used)]
fn builtin_regex(source: &str) -> Regex {
    // Literal patterns, exercised by `default_patterns_compile_and_match`.
    Regex::new(source).expect("built-in shortcut pattern must compile")
}
