#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for loading and storing documents.
//!
//! These tests exercise the parser and serializer together through the
//! public [`Document`] API and the filesystem, verifying that:
//! - stored text is stable across load/store cycles
//! - the canonical layout of a realistic file does not drift
//! - line endings and text encodings survive a round trip
//! - edits land where they belong in the stored text

mod common;

use inikit::document::{Document, LineEnding, TextEncoding};
use inikit::error::DocumentError;

const APP_INI: &str = include_str!("fixtures/app.ini");

// ---------------------------------------------------------------------------
// Layout fidelity
// ---------------------------------------------------------------------------

/// Canonical layout of the fixture.
///
/// Separators lose their surrounding blanks and take the canonical symbol,
/// comments and blank lines stay where they were, and continuation lines are
/// aligned under the first character of the value.
#[test]
fn formatted_fixture() {
    let document = Document::from_text(APP_INI);
    insta::assert_snapshot!(document.store_string(Some(LineEnding::Lf)), @r"
    ; Application settings
    name=inikit demo
    version=1.0

    [database]
    # connection
    host=db.local
    port=5432
    url=postgres://${ref:database/host}:${ref:database/port}/${ref:/name}

    [paths]
    home=${sys:user.home}
    list=alpha, \
         beta, \
         gamma
    greeting=Grüße
    escaped=Gr\u00FC\u00DFe
    ");
}

/// Storing, reloading and storing again yields the same text and document.
#[test]
fn store_is_stable() {
    let first = Document::from_text(APP_INI);
    let text = first.store_string(None);
    let second = Document::from_text(&text);
    assert_eq!(second.store_string(None), text);
    assert_eq!(second.sections(), first.sections());
}

/// A CRLF file is written back with CRLF unless told otherwise.
#[test]
fn crlf_is_inferred_and_kept() {
    let crlf = APP_INI.replace('\n', "\r\n");
    let document = Document::from_text(&crlf);
    assert_eq!(document.line_ending(), LineEnding::CrLf);
    let stored = document.store_string(None);
    assert!(stored.contains("[database]\r\n"));
    assert!(!stored.replace("\r\n", "").contains('\n'));
    assert!(!document.store_string(Some(LineEnding::Lf)).contains('\r'));
}

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

/// UTF-16 files are written big-endian with a byte order mark and read back
/// to the same document.
#[test]
fn utf16_round_trip_through_file() {
    let ctx = common::IntegrationTestContext::new();
    let path = ctx.path("wide.ini");
    let document = Document::from_text(APP_INI);
    document
        .store_path(&path, TextEncoding::Utf16, None)
        .unwrap();

    let bytes = ctx.read_bytes("wide.ini");
    assert_eq!(&bytes[..2], &[0xFE, 0xFF]);

    let mut reloaded = Document::default();
    reloaded.load_path(&path, TextEncoding::Utf16).unwrap();
    assert_eq!(reloaded.sections(), document.sections());
    assert_eq!(reloaded.value("paths", "greeting").unwrap(), "Grüße");
}

/// Latin-1 stores accented letters as single bytes.
#[test]
fn latin1_round_trip() {
    let mut document = Document::default();
    document.set_value("s", "city", "Zürich").unwrap();
    let mut bytes = Vec::new();
    document
        .store(&mut bytes, TextEncoding::Latin1, Some(LineEnding::Lf))
        .unwrap();
    assert_eq!(bytes, b"[s]\ncity=Z\xFCrich\n");

    let mut reloaded = Document::default();
    reloaded.load(bytes.as_slice(), TextEncoding::Latin1).unwrap();
    assert_eq!(reloaded.raw_value("s", "city"), Some("Zürich"));
}

/// A character outside the target encoding is an error, not silent loss.
#[test]
fn unmappable_character_is_rejected() {
    let mut document = Document::default();
    document.set_value("s", "price", "5 €").unwrap();
    let err = document
        .store(Vec::new(), TextEncoding::Ascii, None)
        .unwrap_err();
    assert!(matches!(err, DocumentError::Unmappable { character: '€', .. }));
}

/// Invalid UTF-8 input is reported.
#[test]
fn invalid_utf8_is_rejected() {
    let ctx = common::TestContextBuilder::new()
        .with_file("bad.ini", [b'k', b'=', 0xFF, b'\n'])
        .build();
    let mut document = Document::default();
    let err = document
        .load_path(&ctx.path("bad.ini"), TextEncoding::Utf8)
        .unwrap_err();
    assert!(matches!(err, DocumentError::Decode { .. }));
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// Edits keep the surrounding layout, comments included.
#[test]
fn edits_keep_layout() {
    let mut document = Document::from_text("; head\n[a]\n# about k\nk=1\nj=2\n\n[b]\nx=y\n");
    document.set_value("a", "k", "10").unwrap();
    document.set_value("a", "new", "n").unwrap();
    assert!(document.remove_key("a", "j"));
    assert!(document.rename_section("b", "c"));
    document.set_value("", "top", "t").unwrap();
    assert_eq!(
        document.store_string(Some(LineEnding::Lf)),
        "; head\ntop=t\n[a]\n# about k\nk=10\n\nnew=n\n[c]\nx=y\n"
    );
}

/// Merging copies values, joining multi-line ones.
#[test]
fn add_all_merges_documents() {
    let mut base = Document::from_text("[a]\nk=1\n");
    let other = Document::from_text("[a]\nk=2\nlist=x, \\\n  y\n[b]\nz=3\n");
    base.add_all(&other).unwrap();
    assert_eq!(
        base.store_string(Some(LineEnding::Lf)),
        "[a]\nk=2\nlist=x, y\n[b]\nz=3\n"
    );
}

/// The sorted fixture keeps the global section first and drops comments.
#[test]
fn sorted_fixture() {
    let mut document = Document::from_text(APP_INI);
    document.sort();
    assert_eq!(document.section_names(), ["", "database", "paths"]);
    assert_eq!(document.key_names("paths"), ["escaped", "greeting", "home", "list"]);
    assert!(!document.store_string(None).contains(';'));
}
