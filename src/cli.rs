//! Command-line surface of the `inikit` binary.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the INI document engine.
#[derive(Parser, Debug)]
#[command(
    name = "inikit",
    about = "Read, resolve, edit and reformat INI documents",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// TOML rule file overriding the default syntax
    #[arg(long, global = true, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Text encoding of the documents (utf-8, utf-16le, utf-16be, utf-16, iso-8859-1, us-ascii)
    #[arg(long, global = true, default_value = "utf-8", value_name = "NAME")]
    pub encoding: String,

    /// Set a process property before resolving values
    #[arg(short = 'D', long = "define", global = true, value_name = "NAME=VALUE")]
    pub define: Vec<String>,
}

impl Default for GlobalOpts {
    fn default() -> Self {
        Self {
            rules: None,
            encoding: "utf-8".to_string(),
            define: Vec::new(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved value of a key
    Get(GetOpts),
    /// Store a value and write the document back
    Set(SetOpts),
    /// Remove a key or a whole section
    Remove(RemoveOpts),
    /// Resolve every value and report the failures
    Check(CheckOpts),
    /// Rewrite a document in canonical layout
    Fmt(FmtOpts),
    /// Print the resolved values of a document
    Dump(DumpOpts),
    /// Print version information
    Version,
}

/// Options for the `get` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GetOpts {
    /// Document to read
    pub file: PathBuf,
    /// Section name (empty for the global section)
    pub section: String,
    /// Key name
    pub key: String,
    /// Value printed when the key is absent or blank
    #[arg(long)]
    pub default: Option<String>,
    /// Print the stored text without decoding escapes or expanding shortcuts
    #[arg(long)]
    pub raw: bool,
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// Document to update (created when missing)
    pub file: PathBuf,
    /// Section name (empty for the global section)
    pub section: String,
    /// Key name
    pub key: String,
    /// Value to store
    pub value: String,
    /// Store non-ASCII characters as \uXXXX escapes
    #[arg(long)]
    pub escape_unicode: bool,
}

/// Options for the `remove` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RemoveOpts {
    /// Document to update
    pub file: PathBuf,
    /// Section name (empty for the global section)
    pub section: String,
    /// Key to remove; without it the whole section is removed
    pub key: Option<String>,
    /// Empty the section but keep its header
    #[arg(long)]
    pub keep_section: bool,
}

/// Options for the `check` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CheckOpts {
    /// Document to check
    pub file: PathBuf,
}

/// Options for the `fmt` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct FmtOpts {
    /// Document to format
    pub file: PathBuf,
    /// Sort sections and keys (drops comments)
    #[arg(long)]
    pub sort: bool,
    /// Line ending to write (lf, crlf, cr); defaults to the inferred one
    #[arg(long, value_name = "STYLE")]
    pub line_ending: Option<String>,
    /// Write to this file instead of rewriting the input
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Options for the `dump` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DumpOpts {
    /// Document to read
    pub file: PathBuf,
    /// Only dump this section
    #[arg(long)]
    pub section: Option<String>,
    /// Emit JSON instead of INI-style lines
    #[arg(long)]
    pub json: bool,
}
