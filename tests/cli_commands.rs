#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the subcommands.
//!
//! These tests parse real command lines with [`Cli`] and run the matching
//! command against files in an isolated workspace, verifying that:
//! - `get` and `dump` print resolved values
//! - `set`, `remove` and `fmt` rewrite files in place
//! - `check` fails on unresolvable values and counts them
//! - global options (rule files, encodings, `-D`) reach the engine

mod common;

use clap::Parser;

use inikit::cli::{Cli, Command};
use inikit::commands;
use inikit::logging::Logger;

/// Run `args` against the workspace, returning what the command printed.
fn run(args: &[&str]) -> anyhow::Result<String> {
    run_with(args, &Logger::new())
}

/// Like [`run`], logging through `log`.
fn run_with(args: &[&str], log: &Logger) -> anyhow::Result<String> {
    let cli = Cli::parse_from(std::iter::once("inikit").chain(args.iter().copied()));
    let mut out = Vec::new();
    match &cli.command {
        Command::Get(opts) => commands::get::run(&cli.global, opts, log, &mut out)?,
        Command::Set(opts) => commands::set::run(&cli.global, opts, log)?,
        Command::Remove(opts) => commands::remove::run(&cli.global, opts, log)?,
        Command::Check(opts) => commands::check::run(&cli.global, opts, log)?,
        Command::Fmt(opts) => commands::fmt::run(&cli.global, opts, log)?,
        Command::Dump(opts) => commands::dump::run(&cli.global, opts, log, &mut out)?,
        Command::Version => commands::version::run(&mut out)?,
    }
    Ok(String::from_utf8(out).unwrap())
}

fn arg(path: &std::path::Path) -> &str {
    path.to_str().unwrap()
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// `get` resolves references and reads the global section with `""`.
#[test]
fn get_resolves_values() {
    let ctx = common::TestContextBuilder::new()
        .with_file("app.ini", include_str!("fixtures/app.ini"))
        .build();
    let file = ctx.path("app.ini");
    assert_eq!(
        run(&["get", arg(&file), "database", "url"]).unwrap(),
        "postgres://db.local:5432/inikit demo\n"
    );
    assert_eq!(run(&["get", arg(&file), "", "version"]).unwrap(), "1.0\n");
    assert_eq!(
        run(&["get", arg(&file), "paths", "escaped", "--raw"]).unwrap(),
        "Gr\\u00FC\\u00DFe\n"
    );
}

/// `-D` definitions are visible to `${sys:…}` shortcuts.
#[test]
fn get_sees_defined_properties() {
    let ctx = common::TestContextBuilder::new()
        .with_file("p.ini", "[p]\nregion=${sys:inikit.cli.region}-1\n")
        .build();
    let file = ctx.path("p.ini");
    assert_eq!(
        run(&["-D", "inikit.cli.region=eu", "get", arg(&file), "p", "region"]).unwrap(),
        "eu-1\n"
    );
}

/// A missing value is an error unless a default is given.
#[test]
fn get_missing_value() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "[a]\n")
        .build();
    let file = ctx.path("a.ini");
    assert!(run(&["get", arg(&file), "a", "k"]).is_err());
    assert_eq!(
        run(&["get", arg(&file), "a", "k", "--default", "fallback"]).unwrap(),
        "fallback\n"
    );
}

/// A rule file given with `--rules` changes how the document is parsed.
#[test]
fn rules_option_changes_dialect() {
    let ctx = common::TestContextBuilder::new()
        .with_rules("[symbols]\nsection_starts = [\"<\"]\nsection_ends = [\">\"]\n")
        .with_file("a.ini", "<srv>\nport=80\n")
        .build();
    let file = ctx.path("a.ini");
    let rules = ctx.path("rules.toml");
    assert_eq!(
        run(&["--rules", arg(&rules), "get", arg(&file), "srv", "port"]).unwrap(),
        "80\n"
    );
}

/// `dump --json` emits every section in order.
#[test]
fn dump_json() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "top=1\n[a]\nk=v\nr=${ref:a/k}\n")
        .build();
    let out = run(&["dump", arg(&ctx.path("a.ini")), "--json"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["section"], "");
    assert_eq!(parsed[1]["values"][1]["value"], "v");
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// `set` then `get` sees the new value; the rest of the file is unchanged.
#[test]
fn set_then_get() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "; keep me\n[a]\nk=1\n")
        .build();
    let file = ctx.path("a.ini");
    run(&["set", arg(&file), "a", "k", "2"]).unwrap();
    run(&["set", arg(&file), "b", "n", "Öl", "--escape-unicode"]).unwrap();
    assert_eq!(ctx.read("a.ini"), "; keep me\n[a]\nk=2\n[b]\nn=\\u00D6l\n");
    assert_eq!(run(&["get", arg(&file), "b", "n"]).unwrap(), "Öl\n");
}

/// `set` honours `--encoding`.
#[test]
fn set_writes_requested_encoding() {
    let ctx = common::IntegrationTestContext::new();
    let file = ctx.path("wide.ini");
    run(&["--encoding", "utf-16le", "set", arg(&file), "s", "k", "v"]).unwrap();
    let bytes = ctx.read_bytes("wide.ini");
    assert_eq!(&bytes[..4], &[b'[', 0, b's', 0]);
    assert_eq!(
        run(&["--encoding", "UTF-16LE", "get", arg(&file), "s", "k"]).unwrap(),
        "v\n"
    );
}

/// `remove` drops a section with its header.
#[test]
fn remove_section() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "[a]\nk=1\n[b]\nj=2\n")
        .build();
    run(&["remove", arg(&ctx.path("a.ini")), "a"]).unwrap();
    assert_eq!(ctx.read("a.ini"), "[b]\nj=2\n");
}

/// Removing something absent leaves the file alone and counts a warning.
#[test]
fn remove_missing_key_is_a_warning() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "[a]\nk=1\n")
        .build();
    let log = Logger::new();
    run_with(&["remove", arg(&ctx.path("a.ini")), "a", "nope"], &log).unwrap();
    assert_eq!(ctx.read("a.ini"), "[a]\nk=1\n");
    assert_eq!(log.summary().as_deref(), Some("1 warning(s)"));
}

/// `fmt --sort --line-ending crlf` rewrites the file in place.
#[test]
fn fmt_in_place() {
    let ctx = common::TestContextBuilder::new()
        .with_file("a.ini", "[z]\n b = 2 \n a = 1\n[m]\nk=v\n")
        .build();
    run(&["fmt", arg(&ctx.path("a.ini")), "--sort", "--line-ending", "crlf"]).unwrap();
    assert_eq!(ctx.read("a.ini"), "[m]\r\nk=v\r\n[z]\r\na=1\r\nb=2\r\n");
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

/// `check` passes a clean file and fails a cyclic one.
#[test]
fn check_reports_cycles() {
    let ctx = common::TestContextBuilder::new()
        .with_file("ok.ini", include_str!("fixtures/app.ini"))
        .with_file("bad.ini", "[a]\nx=${ref:a/x}\n")
        .build();
    run(&["check", arg(&ctx.path("ok.ini"))]).unwrap();
    let err = run(&["check", arg(&ctx.path("bad.ini"))]).unwrap_err();
    assert_eq!(err.to_string(), "1 of 1 value(s) failed to resolve");
}

/// `version` prints the binary name.
#[test]
fn version_prints_name() {
    assert!(run(&["version"]).unwrap().starts_with("inikit "));
}
