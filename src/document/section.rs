//! Named, ordered group of comment and key/value lines.
use super::entry::Entry;

/// One line of a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Line {
    /// A comment or blank line.
    Comment(Entry),
    /// A key and its value.
    KeyValue(String, Entry),
}

impl Line {
    /// Key of a key/value line.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Comment(_) => None,
            Self::KeyValue(key, _) => Some(key),
        }
    }

    /// The stored entry.
    #[must_use]
    pub const fn entry(&self) -> &Entry {
        match self {
            Self::Comment(entry) | Self::KeyValue(_, entry) => entry,
        }
    }
}

/// A named section. The global section has the empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    lines: Vec<Line>,
}

impl Section {
    /// An empty section.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Vec::new(),
        }
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the global (unnamed) section.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    /// Lines in file order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(Line::key)
    }

    /// Stored entry of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.lines.iter().find_map(|line| match line {
            Line::KeyValue(k, entry) if k == key => Some(entry),
            _ => None,
        })
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append a comment line.
    pub fn push_comment(&mut self, entry: Entry) {
        self.lines.push(Line::Comment(entry));
    }

    /// Store `entry` under `key`, replacing an existing entry in place or
    /// appending a new line.
    pub fn insert(&mut self, key: &str, entry: Entry) {
        if let Some(slot) = self.get_mut(key) {
            *slot = entry;
        } else {
            self.lines.push(Line::KeyValue(key.to_string(), entry));
        }
    }

    /// Mutable access to the entry of `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.lines.iter_mut().find_map(|line| match line {
            Line::KeyValue(k, entry) if k == key => Some(entry),
            _ => None,
        })
    }

    /// Remove `key`, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let i = self.lines.iter().position(|line| line.key() == Some(key))?;
        match self.lines.remove(i) {
            Line::KeyValue(_, entry) => Some(entry),
            Line::Comment(_) => None,
        }
    }

    /// Rename `from` to `to` in place. Fails if `from` is absent or `to`
    /// already exists.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if self.contains_key(to) {
            return false;
        }
        let found = self.lines.iter_mut().find_map(|line| match line {
            Line::KeyValue(k, _) if k == from => Some(k),
            _ => None,
        });
        match found {
            Some(key) => {
                to.clone_into(key);
                true
            }
            None => false,
        }
    }

    /// Change the section name.
    pub(crate) fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Drop comments and order the remaining keys with `cmp`.
    pub(crate) fn sort_keys_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&str, &str) -> std::cmp::Ordering,
    {
        self.lines.retain(|line| matches!(line, Line::KeyValue(..)));
        self.lines.sort_by(|a, b| {
            cmp(
                a.key().unwrap_or_default(),
                b.key().unwrap_or_default(),
            )
        });
    }
}
