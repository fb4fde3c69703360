//! Splits a character source into lines and infers its line-ending style.
use std::fmt;
use std::iter::Peekable;
use std::str::FromStr;

/// A line terminator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n` (Unix).
    Lf,
    /// `\r\n` (Windows).
    CrLf,
    /// `\r` (classic Mac OS).
    Cr,
}

impl LineEnding {
    /// The terminator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// The native convention of the platform this binary was built for.
    #[must_use]
    pub const fn platform() -> Self {
        if cfg!(windows) { Self::CrLf } else { Self::Lf }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::platform()
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lf => "lf",
            Self::CrLf => "crlf",
            Self::Cr => "cr",
        })
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" | "unix" => Ok(Self::Lf),
            "crlf" | "windows" | "dos" => Ok(Self::CrLf),
            "cr" | "mac" => Ok(Self::Cr),
            other => Err(format!(
                "unknown line ending '{other}' (expected lf, crlf or cr)"
            )),
        }
    }
}

/// Iterator over the lines of a character source, terminators stripped.
///
/// A final line without terminator is still produced; a terminator at the
/// very end does not produce an extra empty line. While reading, `\r` and
/// `\n` are counted (a `\r\n` pair counts once for each) so the dominant
/// convention can be inferred afterwards.
///
/// # Examples
///
/// ```
/// use inikit::document::{LineEnding, LineReader};
///
/// let mut reader = LineReader::new("a\r\nb\r\n".chars());
/// assert_eq!(reader.by_ref().collect::<Vec<_>>(), ["a", "b"]);
/// assert_eq!(reader.inferred_line_ending(), LineEnding::CrLf);
/// ```
#[derive(Debug)]
pub struct LineReader<I: Iterator<Item = char>> {
    chars: Peekable<I>,
    cr_count: usize,
    lf_count: usize,
}

impl<I: Iterator<Item = char>> LineReader<I> {
    /// Wrap a character source.
    pub fn new(chars: I) -> Self {
        Self {
            chars: chars.peekable(),
            cr_count: 0,
            lf_count: 0,
        }
    }

    /// The dominant line ending among the terminators read so far.
    ///
    /// Platform default when none was seen, `CrLf` when `\r` and `\n`
    /// counts are equal, otherwise whichever of the two is more frequent.
    #[must_use]
    pub const fn inferred_line_ending(&self) -> LineEnding {
        if self.cr_count == 0 && self.lf_count == 0 {
            LineEnding::platform()
        } else if self.cr_count == self.lf_count {
            LineEnding::CrLf
        } else if self.cr_count > self.lf_count {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }

    /// Number of `\r` and `\n` characters seen so far.
    #[must_use]
    pub const fn terminator_counts(&self) -> (usize, usize) {
        (self.cr_count, self.lf_count)
    }
}

impl<I: Iterator<Item = char>> Iterator for LineReader<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = String::new();
        loop {
            match self.chars.next() {
                None if line.is_empty() => return None,
                None => return Some(line),
                Some('\n') => {
                    self.lf_count += 1;
                    return Some(line);
                }
                Some('\r') => {
                    self.cr_count += 1;
                    if self.chars.next_if_eq(&'\n').is_some() {
                        self.lf_count += 1;
                    }
                    return Some(line);
                }
                Some(c) => line.push(c),
            }
        }
    }
}
