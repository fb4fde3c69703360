//! Command: remove a key or a section.
use anyhow::Result;

use super::{CommandSetup, section_label};
use crate::cli::{GlobalOpts, RemoveOpts};
use crate::logging::Log;

/// Remove `opts.key`, or the whole section when no key is given, and write
/// the document back. Removing something absent is reported but not an
/// error; the file is then left untouched.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or written.
pub fn run(global: &GlobalOpts, opts: &RemoveOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let mut document = setup.load(&opts.file)?;
    let section = section_label(&opts.section);

    let (removed, what) = match &opts.key {
        Some(key) => (
            document.remove_key(&opts.section, key),
            format!("key '{key}' of section '{section}'"),
        ),
        None => (
            document.remove_section(&opts.section, !opts.keep_section),
            format!("section '{section}'"),
        ),
    };

    if !removed {
        log.warn(&format!("{what} not found in {}", opts.file.display()));
        return Ok(());
    }
    setup.store(&document, &opts.file, None)?;
    log.info(&format!("removed {what}"));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::tests::quiet_log;
    use crate::logging::MockLog;
    use std::path::{Path, PathBuf};

    fn opts(file: &Path, section: &str, key: Option<&str>) -> RemoveOpts {
        RemoveOpts {
            file: file.to_path_buf(),
            section: section.to_string(),
            key: key.map(str::to_string),
            keep_section: false,
        }
    }

    fn fixture(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "top=1\n[a]\nk=v\nj=w\n[b]\nx=y\n").unwrap();
        path
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn removes_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        run(&GlobalOpts::default(), &opts(&path, "a", Some("k")), &quiet_log()).unwrap();
        assert_eq!(read(&path), "top=1\n[a]\nj=w\n[b]\nx=y\n");
    }

    #[test]
    fn removes_whole_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        run(&GlobalOpts::default(), &opts(&path, "a", None), &quiet_log()).unwrap();
        assert_eq!(read(&path), "top=1\n[b]\nx=y\n");
    }

    #[test]
    fn keep_section_empties_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut keep = opts(&path, "a", None);
        keep.keep_section = true;
        run(&GlobalOpts::default(), &keep, &quiet_log()).unwrap();
        assert_eq!(read(&path), "top=1\n[a]\n[b]\nx=y\n");
    }

    #[test]
    fn global_section_is_only_emptied() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        run(&GlobalOpts::default(), &opts(&path, "", None), &quiet_log()).unwrap();
        assert_eq!(read(&path), "[a]\nk=v\nj=w\n[b]\nx=y\n");
    }

    #[test]
    fn absent_key_warns_and_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut log = MockLog::new();
        log.expect_debug().return_const(());
        log.expect_warn()
            .withf(|msg: &str| msg.contains("key 'nope'") && msg.contains("not found"))
            .times(1)
            .return_const(());
        run(&GlobalOpts::default(), &opts(&path, "a", Some("nope")), &log).unwrap();
        assert_eq!(read(&path), "top=1\n[a]\nk=v\nj=w\n[b]\nx=y\n");
    }
}
