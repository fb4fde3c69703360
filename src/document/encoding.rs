//! Byte encodings accepted when loading and storing documents.
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;

const BOM: char = '\u{FEFF}';
const BOM_UNIT: u16 = 0xFEFF;

/// A supported text encoding.
///
/// # Examples
///
/// ```
/// use inikit::document::TextEncoding;
///
/// let latin1: TextEncoding = "latin1".parse().unwrap();
/// assert_eq!(latin1.name(), "ISO-8859-1");
/// assert_eq!(latin1.decode(&[0x63, 0x61, 0x66, 0xE9]).unwrap(), "café");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    /// UTF-8. A leading byte-order mark is skipped.
    #[default]
    Utf8,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// UTF-16 with byte-order detection; big endian when no mark is present.
    /// Written big endian with a byte-order mark.
    Utf16,
    /// ISO-8859-1 (Latin-1).
    Latin1,
    /// 7-bit US-ASCII.
    Ascii,
}

impl TextEncoding {
    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16 => "UTF-16",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Decode `bytes` into text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Decode`] if the bytes are not valid in this
    /// encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String, DocumentError> {
        let text = match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| self.decode_error(e))?,
            Self::Utf16Le => decode_utf16(self, bytes, u16::from_le_bytes)?,
            Self::Utf16Be => decode_utf16(self, bytes, u16::from_be_bytes)?,
            Self::Utf16 => match bytes {
                [0xFF, 0xFE, ..] => decode_utf16(self, bytes, u16::from_le_bytes)?,
                _ => decode_utf16(self, bytes, u16::from_be_bytes)?,
            },
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
            Self::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(self.decode_error(format!("non-ASCII byte at offset {pos}")));
                }
                bytes.iter().copied().map(char::from).collect()
            }
        };
        Ok(match text.strip_prefix(BOM) {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }

    /// Encode `text` into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Unmappable`] for a character this encoding
    /// cannot represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, DocumentError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Utf16 => Ok(std::iter::once(BOM_UNIT)
                .chain(text.encode_utf16())
                .flat_map(u16::to_be_bytes)
                .collect()),
            Self::Latin1 | Self::Ascii => {
                let limit = if self == Self::Latin1 { 0xFF } else { 0x7F };
                text.chars()
                    .map(|character| {
                        u8::try_from(u32::from(character))
                            .ok()
                            .filter(|b| u32::from(*b) <= limit)
                            .ok_or_else(|| DocumentError::Unmappable {
                                encoding: self.name(),
                                character,
                            })
                    })
                    .collect()
            }
        }
    }

    fn decode_error(self, reason: impl fmt::Display) -> DocumentError {
        DocumentError::Decode {
            encoding: self.name(),
            reason: reason.to_string(),
        }
    }
}

fn decode_utf16(
    encoding: TextEncoding,
    bytes: &[u8],
    unit: fn([u8; 2]) -> u16,
) -> Result<String, DocumentError> {
    let (pairs, rest) = bytes.as_chunks::<2>();
    if !rest.is_empty() {
        return Err(encoding.decode_error("odd number of bytes"));
    }
    char::decode_utf16(pairs.iter().copied().map(unit))
        .collect::<Result<String, _>>()
        .map_err(|e| encoding.decode_error(e))
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "UTF8" => Ok(Self::Utf8),
            "UTF16LE" => Ok(Self::Utf16Le),
            "UTF16BE" => Ok(Self::Utf16Be),
            "UTF16" => Ok(Self::Utf16),
            "ISO88591" | "LATIN1" | "L1" => Ok(Self::Latin1),
            "USASCII" | "ASCII" => Ok(Self::Ascii),
            _ => Err(DocumentError::UnsupportedEncoding(s.to_string())),
        }
    }
}
