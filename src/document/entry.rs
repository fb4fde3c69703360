//! One stored unit of a section: a comment line or a value.

/// A comment line or a (possibly multi-line) value.
///
/// Whether an entry is a comment is fixed at construction; the value text can
/// be replaced in place. Multi-line values store their fragments joined by
/// `\n`, each fragment but the last still ending with its continuation
/// marker.
///
/// # Examples
///
/// ```
/// use inikit::document::Entry;
///
/// let entry = Entry::value("8080");
/// assert!(!entry.is_comment());
/// assert_eq!(entry.text(), "8080");
///
/// let comment = Entry::comment("; listening port");
/// assert!(comment.is_comment());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    comment: bool,
    concat: bool,
    text: String,
}

impl Entry {
    /// A comment or blank line, stored verbatim.
    #[must_use]
    pub fn comment(text: &str) -> Self {
        Self {
            comment: true,
            concat: false,
            text: text.to_string(),
        }
    }

    /// A single-line value.
    #[must_use]
    pub fn value(text: &str) -> Self {
        Self {
            comment: false,
            concat: false,
            text: text.to_string(),
        }
    }

    /// A multi-line value made of `fragments`.
    #[must_use]
    pub fn concat<S: AsRef<str>>(fragments: &[S]) -> Self {
        let text = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            comment: false,
            concat: true,
            text,
        }
    }

    /// Whether this entry is a comment line.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        self.comment
    }

    /// Whether this entry is a multi-line value.
    #[must_use]
    pub const fn is_concat(&self) -> bool {
        self.concat
    }

    /// Stored text, fragments of a multi-line value joined by `\n`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fragments of the stored text (a single one unless multi-line).
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Replace the value. A multi-line value becomes a single-line one.
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.concat = false;
    }

    /// The stored text with every `marker` + `\n` joint removed.
    #[must_use]
    pub fn joined(&self, marker: &str) -> String {
        if self.concat {
            self.text.replace(&format!("{marker}\n"), "")
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn comment_is_never_concat() {
        let entry = Entry::comment("# note");
        assert!(entry.is_comment());
        assert!(!entry.is_concat());
        assert_eq!(entry.text(), "# note");
    }

    #[test]
    fn concat_joins_fragments_with_newline() {
        let entry = Entry::concat(&["a \\", "b \\", "c"]);
        assert!(entry.is_concat());
        assert_eq!(entry.text(), "a \\\nb \\\nc");
        assert_eq!(entry.fragments().collect::<Vec<_>>(), ["a \\", "b \\", "c"]);
    }

    #[test]
    fn joined_removes_marker_joints() {
        let entry = Entry::concat(&["one, \\", "two, \\", "three"]);
        assert_eq!(entry.joined("\\"), "one, two, three");
    }

    #[test]
    fn joined_leaves_single_line_values_alone() {
        let entry = Entry::value("C:\\\nraw");
        assert_eq!(entry.joined("\\"), "C:\\\nraw");
    }

    #[test]
    fn set_text_clears_concat() {
        let mut entry = Entry::concat(&["a \\", "b"]);
        entry.set_text("plain");
        assert!(!entry.is_concat());
        assert_eq!(entry.text(), "plain");
    }

    #[test]
    fn equality_and_hash_use_every_field() {
        let mut set = HashSet::new();
        set.insert(Entry::value("x"));
        set.insert(Entry::comment("x"));
        set.insert(Entry::concat(&["x"]));
        set.insert(Entry::value("x"));
        assert_eq!(set.len(), 3);
        assert_ne!(Entry::value("x"), Entry::comment("x"));
    }
}
