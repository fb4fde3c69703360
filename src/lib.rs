//! Rule-driven INI document engine.
//!
//! Reads INI text into an ordered, comment-preserving [`Document`], resolves
//! values through Unicode escapes and `${env:…}`, `${sys:…}` and `${ref:…}`
//! shortcuts, and writes documents back with their layout intact.
//!
//! The public API is organised into these layers:
//!
//! - **[`rules`]**: the syntax dialect (symbols, features, shortcut patterns)
//!   and its TOML rule files
//! - **[`document`]**: line reading, parsing, the document model, value
//!   resolution and serialization
//! - **[`lookup`]**: environment and process-property sources for shortcuts
//! - **[`commands`]**: the subcommands of the `inikit` binary
//!
//! [`Document`]: document::Document
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod document;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod rules;
