//! Domain-specific error types for the INI engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Engine modules return typed errors (e.g., [`DocumentError`],
//! [`ResolveError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! InikitError
//! ├── Document(DocumentError)  stream I/O, encodings, forbidden characters
//! ├── Resolve(ResolveError)    Unicode escapes, shortcut cycles
//! └── Rules(RuleError)         rule validation, rule files
//! ```

use std::fmt;

use thiserror::Error;

/// Top-level error type for the INI engine.
///
/// Aggregates the per-layer errors and is convertible to [`anyhow::Error`]
/// for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum InikitError {
    /// Loading, storing or mutating a document failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A value could not be resolved.
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// A rule set is invalid or could not be loaded.
    #[error("Rule error: {0}")]
    Rules(#[from] RuleError),
}

/// The part of a `set_value` call that carried a forbidden character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The section name.
    Section,
    /// The key name.
    Key,
    /// The value.
    Value,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Section => "section name",
            Self::Key => "key name",
            Self::Value => "key value",
        })
    }
}

/// Errors raised while loading, storing or mutating a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A file could not be read or written.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An unnamed stream could not be read or written.
    #[error("IO error on stream: {0}")]
    Stream(#[from] std::io::Error),

    /// A line terminator was found in a section name, key name or value.
    #[error("Line terminators are forbidden in the INI {field}: {value:?}")]
    InvalidArgument {
        /// Which argument was rejected.
        field: Field,
        /// The rejected text.
        value: String,
    },

    /// The encoding name is not one the engine knows.
    #[error("Unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    /// The input bytes are not valid in the requested encoding.
    #[error("Input is not valid {encoding}: {reason}")]
    Decode {
        /// Canonical name of the encoding.
        encoding: &'static str,
        /// What was wrong with the input.
        reason: String,
    },

    /// A character cannot be represented in the output encoding.
    #[error("Character {character:?} cannot be encoded as {encoding}")]
    Unmappable {
        /// Canonical name of the encoding.
        encoding: &'static str,
        /// The offending character.
        character: char,
    },
}

/// Errors raised while resolving a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A `\uXXXX` escape sequence is malformed.
    #[error("Malformed Unicode escape in {value:?}: {reason}")]
    MalformedEscape {
        /// The value being decoded.
        value: String,
        /// What was wrong with the escape.
        reason: String,
    },

    /// Shortcut resolution exceeded the configured recursion depth.
    #[error(
        "Shortcut recursion limit exceeded, probably a reference cycle (section: \"{section}\", key: \"{key}\")"
    )]
    CycleDetected {
        /// Section being resolved when the limit was hit.
        section: String,
        /// Key being resolved when the limit was hit.
        key: String,
    },
}

/// Errors raised while building or loading a rule set.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A shortcut pattern does not compile.
    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        /// Name of the rule holding the pattern.
        rule: &'static str,
        /// Compilation error from the regex engine.
        source: regex::Error,
    },

    /// A symbol list is empty once its members are trimmed.
    #[error("Rule '{rule}' needs at least one non-blank symbol")]
    EmptySymbols {
        /// Name of the rule holding the list.
        rule: &'static str,
    },

    /// A shortcut recursion depth is above the supported ceiling.
    #[error("Shortcut depth {depth} exceeds the limit of {limit}")]
    DepthTooLarge {
        /// Requested depth.
        depth: u32,
        /// Largest accepted depth.
        limit: u32,
    },

    /// A rule file could not be read.
    #[error("IO error reading rule file {path}: {source}")]
    Io {
        /// Path of the rule file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A rule file is not valid TOML or has unknown fields.
    #[error("Invalid rule file {path}: {source}")]
    Parse {
        /// Path of the rule file (`<string>` for in-memory input).
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}
