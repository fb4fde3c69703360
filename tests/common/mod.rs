// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can lay out its INI and rule files without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use inikit::cli::GlobalOpts;

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory holding the test files.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Absolute path of `name` inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Raw bytes of `name`.
    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path(name)).expect("read test file")
    }

    /// UTF-8 content of `name`.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read test file")
    }

    /// Global options pointing at the workspace's `rules.toml` if one was
    /// written.
    pub fn global_opts(&self) -> GlobalOpts {
        let rules = self.path("rules.toml");
        GlobalOpts {
            rules: rules.exists().then_some(rules),
            ..GlobalOpts::default()
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `name`, creating parent directories.
    pub fn with_file(self, name: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.ctx.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write test file");
        self
    }

    /// Write a `rules.toml` picked up by [`IntegrationTestContext::global_opts`].
    pub fn with_rules(self, content: &str) -> Self {
        self.with_file("rules.toml", content)
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Load `path` with the built-in rules.
pub fn load(path: &Path) -> inikit::document::Document {
    let mut document = inikit::document::Document::default();
    document
        .load_path(path, inikit::document::TextEncoding::Utf8)
        .expect("load document");
    document
}
