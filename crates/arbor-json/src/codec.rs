//! String escaping and number formatting/parsing shared by the decoder and
//! encoder.
//!
//! # Key behaviors
//!
//! - `escape`/`unescape` work on string *bodies* (no surrounding quotes).
//! - `\uXXXX` decoding joins surrogate pairs into one code point; a lone
//!   surrogate decodes to U+FFFD rather than failing, so adversarial input
//!   degrades instead of aborting a whole parse.
//! - Numbers print in the shortest decimal form that parses back to the same
//!   `f64`, except that exact integers print with no decimal point and
//!   NaN/infinity print as `null` (they have no JSON representation).

use crate::error::{ParseError, ParseErrorKind};

/// Escape a string into a JSON string body.
///
/// `"`, `\`, and the short control escapes get their two-character forms;
/// remaining control characters become `\u00XX`. Non-ASCII text passes
/// through unescaped, since UTF-8 is legal inside JSON strings.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Decode a JSON string body, resolving escape sequences.
///
/// The error offset is relative to the start of `body`.
pub fn unescape(body: &str) -> std::result::Result<String, ParseError> {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            // copy the longest escape-free run as one slice
            let start = i;
            while i < bytes.len() && bytes[i] != b'\\' {
                i += 1;
            }
            out.push_str(&body[start..i]);
            continue;
        }
        let escape_at = i;
        i += 1;
        let Some(&tag) = bytes.get(i) else {
            return Err(bad_escape(escape_at));
        };
        i += 1;
        match tag {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let Some(unit) = read_hex4(bytes, i) else {
                    return Err(bad_escape(escape_at));
                };
                i += 4;
                if (0xD800..0xDC00).contains(&unit) {
                    // high surrogate: a low surrogate must follow to form a
                    // supplementary-plane code point
                    let low = if bytes.get(i) == Some(&b'\\') && bytes.get(i + 1) == Some(&b'u') {
                        read_hex4(bytes, i + 2).filter(|u| (0xDC00..0xE000).contains(u))
                    } else {
                        None
                    };
                    match low {
                        Some(low) => {
                            i += 6;
                            out.push(combine_surrogates(unit, low));
                        }
                        None => out.push(char::REPLACEMENT_CHARACTER),
                    }
                } else if (0xDC00..0xE000).contains(&unit) {
                    out.push(char::REPLACEMENT_CHARACTER);
                } else {
                    out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            _ => return Err(bad_escape(escape_at)),
        }
    }
    Ok(out)
}

fn bad_escape(offset: usize) -> ParseError {
    ParseError {
        kind: ParseErrorKind::BadEscape,
        offset,
    }
}

fn read_hex4(bytes: &[u8], at: usize) -> Option<u16> {
    let digits = bytes.get(at..at + 4)?;
    let digits = std::str::from_utf8(digits).ok()?;
    u16::from_str_radix(digits, 16).ok()
}

fn combine_surrogates(high: u16, low: u16) -> char {
    let cp = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Exact integer view of a float, when the conversion round-trips.
pub(crate) fn int_view(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < -(2f64.powi(63)) || value >= 2f64.powi(63) {
        return None;
    }
    let int = value as i64;
    (int as f64 == value).then_some(int)
}

/// Format a number for output.
///
/// The cached integer view wins when present, so integer-valued input keeps
/// its exact digits even past 2^53. NaN and the infinities serialize as
/// `null`. Everything else uses the shortest decimal that round-trips, which
/// never needs exponent notation.
pub fn format_number(value: f64, int: Option<i64>) -> String {
    if let Some(int) = int {
        return int.to_string();
    }
    if !value.is_finite() {
        return "null".to_string();
    }
    format!("{}", value)
}

/// Parse a number at the start of `bytes` under the strict JSON grammar.
///
/// Returns the value, its integer view, and the number of bytes consumed.
/// Rejects leading zeros (`01`), a bare sign, and missing digits after `.`
/// or an exponent marker.
pub fn parse_number(
    bytes: &[u8],
) -> std::result::Result<(f64, Option<i64>, usize), ParseErrorKind> {
    let mut i = 0;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => {
            i += 1;
            if matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
                return Err(ParseErrorKind::BadNumber);
            }
        }
        Some(d) if d.is_ascii_digit() => {
            while matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
                i += 1;
            }
        }
        _ => return Err(ParseErrorKind::BadNumber),
    }
    let mut integral = true;
    if bytes.get(i) == Some(&b'.') {
        integral = false;
        i += 1;
        if !matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
            return Err(ParseErrorKind::BadNumber);
        }
        while matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
            i += 1;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        integral = false;
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
            return Err(ParseErrorKind::BadNumber);
        }
        while matches!(bytes.get(i), Some(d) if d.is_ascii_digit()) {
            i += 1;
        }
    }
    let text = std::str::from_utf8(&bytes[..i]).map_err(|_| ParseErrorKind::BadNumber)?;
    let value: f64 = text.parse().map_err(|_| ParseErrorKind::BadNumber)?;
    let int = if integral {
        // parse the digits directly so integers beyond 2^53 stay exact
        text.parse::<i64>().ok().or_else(|| int_view(value))
    } else {
        int_view(value)
    };
    Ok((value, int, i))
}
