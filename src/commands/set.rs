//! Command: store one value.
use anyhow::{Context as _, Result};

use super::{CommandSetup, section_label};
use crate::cli::{GlobalOpts, SetOpts};
use crate::document::escape;
use crate::logging::Log;

/// Store `opts.value` under `opts.section`/`opts.key` and write the document
/// back with its inferred line ending. A missing file is created.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or written, or an
/// argument contains a line terminator.
pub fn run(global: &GlobalOpts, opts: &SetOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let mut document = setup.load_or_new(&opts.file)?;

    let value = if opts.escape_unicode {
        escape::escape_unicode(&opts.value)
    } else {
        opts.value.clone()
    };
    document
        .set_value(&opts.section, &opts.key, &value)
        .context("cannot set value")?;
    setup.store(&document, &opts.file, None)?;

    log.info(&format!(
        "set {} in section '{}' of {}",
        opts.key,
        section_label(&opts.section),
        opts.file.display()
    ));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::tests::quiet_log;
    use std::path::Path;

    fn opts(file: &Path, section: &str, key: &str, value: &str) -> SetOpts {
        SetOpts {
            file: file.to_path_buf(),
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            escape_unicode: false,
        }
    }

    fn set(opts: &SetOpts) -> Result<()> {
        run(&GlobalOpts::default(), opts, &quiet_log())
    }

    #[test]
    fn updates_existing_key_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "; top\n[s]\nk=old\nj=1\n").unwrap();
        set(&opts(&path, "s", "k", "new")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "; top\n[s]\nk=new\nj=1\n");
    }

    #[test]
    fn keeps_crlf_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "[s]\r\nk=v\r\n").unwrap();
        set(&opts(&path, "s", "n", "w")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[s]\r\nk=v\r\nn=w\r\n");
    }

    #[test]
    fn creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.ini");
        set(&opts(&path, "s", "k", "v")).unwrap();
        let eol = crate::document::LineEnding::platform().as_str();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("[s]{eol}k=v{eol}")
        );
    }

    #[test]
    fn escapes_unicode_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "[s]\n").unwrap();
        let mut escaped = opts(&path, "s", "city", "Zürich");
        escaped.escape_unicode = true;
        set(&escaped).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[s]\ncity=Z\\u00FCrich\n");
    }

    #[test]
    fn rejects_line_terminators() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ini");
        std::fs::write(&path, "[s]\nk=v\n").unwrap();
        assert!(set(&opts(&path, "s", "k", "a\nb")).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[s]\nk=v\n");
    }
}
