//! `\uXXXX` escape sequences.
//!
//! Values may spell characters as `\u` followed by exactly four hexadecimal
//! digits. Characters outside the Basic Multilingual Plane are written as a
//! UTF-16 surrogate pair of two escapes. A backslash followed by anything
//! other than `u` is ordinary text and is kept as is.
use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::ResolveError;

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Replace every `\uXXXX` escape of `value` with the character it denotes.
///
/// ```
/// use inikit::document::escape::decode_unicode;
///
/// assert_eq!(decode_unicode(r"caf\u00E9").unwrap(), "café");
/// assert_eq!(decode_unicode(r"C:\temp\").unwrap(), r"C:\temp\");
/// ```
///
/// # Errors
///
/// Returns [`ResolveError::MalformedEscape`] for non-hexadecimal digits, an
/// escape cut short by the end of the value, or an unpaired surrogate.
pub fn decode_unicode(value: &str) -> Result<String, ResolveError> {
    if !value.contains('\\') {
        return Ok(value.to_string());
    }
    let malformed = |reason: String| ResolveError::MalformedEscape {
        value: value.to_string(),
        reason,
    };

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let unit = read_unit(&mut chars).map_err(malformed)?;
                let code = if HIGH_SURROGATES.contains(&unit) {
                    let low = read_low_surrogate(&mut chars).map_err(malformed)?;
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else if LOW_SURROGATES.contains(&unit) {
                    return Err(malformed(format!("unpaired low surrogate {unit:04X}")));
                } else {
                    unit
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| malformed(format!("invalid code point {code:X}")))?;
                out.push(decoded);
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Ok(out)
}

/// Four hex digits following `\u`.
fn read_unit(chars: &mut Peekable<Chars<'_>>) -> Result<u32, String> {
    let mut unit = 0;
    for _ in 0..4 {
        let c = chars
            .next()
            .ok_or_else(|| "escape truncated by end of value".to_string())?;
        let digit = c
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit {c:?}"))?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}

/// The `\uXXXX` low half that must follow a high surrogate.
fn read_low_surrogate(chars: &mut Peekable<Chars<'_>>) -> Result<u32, String> {
    if chars.next_if_eq(&'\\').is_none() || chars.next_if_eq(&'u').is_none() {
        return Err("high surrogate not followed by a low surrogate".to_string());
    }
    let low = read_unit(chars)?;
    if LOW_SURROGATES.contains(&low) {
        Ok(low)
    } else {
        Err(format!("expected low surrogate, found {low:04X}"))
    }
}

/// Spell every non-ASCII character of `text` as `\uXXXX` escapes
/// (uppercase hex, one escape per UTF-16 unit).
///
/// ```
/// use inikit::document::escape::escape_unicode;
///
/// assert_eq!(escape_unicode("café"), r"caf\u00E9");
/// assert_eq!(escape_unicode("😀"), r"\uD83D\uDE00");
/// ```
#[must_use]
pub fn escape_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04X}");
            }
        }
    }
    out
}
