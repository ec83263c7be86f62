//! Decoding of quoted strings into their logical text.
//!
//! Decoding happens on demand, never while parsing. The raw span handed in
//! is exactly what the scanner produced, quotes included.

use std::borrow::Cow;

/// An escape sequence that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// The offending sequence as written, backslash included.
    pub sequence: String,
    /// Byte offset of the backslash within the raw span.
    pub offset: usize,
}

/// Decode a raw string span, replacing anything malformed.
///
/// A `\u` that is not followed by four hex digits decodes as a plain `u`,
/// and an unpaired UTF-16 surrogate decodes as U+FFFD. Never fails.
pub fn decode(raw: &str) -> Cow<'_, str> {
    match decode_with(raw, false) {
        Ok(text) => text,
        // Lenient decoding has no failure path.
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Decode a raw string span, rejecting malformed `\u` escapes.
pub fn decode_strict(raw: &str) -> Result<Cow<'_, str>, EscapeError> {
    decode_with(raw, true)
}

fn decode_with(raw: &str, strict: bool) -> Result<Cow<'_, str>, EscapeError> {
    let quote = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Ok(Cow::Borrowed(raw)),
    };

    let body = &raw[1..];
    let body = body.strip_suffix(quote).unwrap_or(body);
    if !body.contains('\\') {
        return Ok(Cow::Borrowed(body));
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    loop {
        // Offset of the next character within `raw` (1 for the opening quote).
        let offset = 1 + body.len() - chars.as_str().len();
        let Some(c) = chars.next() else {
            break;
        };
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            // A lone trailing backslash stays as written.
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let rest = chars.as_str();
                let Some(unit) = hex4(rest) else {
                    if strict {
                        let seq: String = rest.chars().take(4).collect();
                        return Err(EscapeError {
                            sequence: format!("\\u{seq}"),
                            offset,
                        });
                    }
                    out.push('u');
                    continue;
                };
                chars = rest[4..].chars();

                match unit {
                    0xD800..=0xDBFF => {
                        let low = chars
                            .as_str()
                            .strip_prefix("\\u")
                            .and_then(hex4)
                            .filter(|low| (0xDC00..=0xDFFF).contains(low));
                        match low {
                            Some(low) => {
                                chars = chars.as_str()[6..].chars();
                                let code = 0x10000
                                    + ((u32::from(unit) - 0xD800) << 10)
                                    + (u32::from(low) - 0xDC00);
                                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                            }
                            None => {
                                if strict {
                                    return Err(unpaired(unit, offset));
                                }
                                out.push(char::REPLACEMENT_CHARACTER);
                            }
                        }
                    }
                    0xDC00..=0xDFFF => {
                        if strict {
                            return Err(unpaired(unit, offset));
                        }
                        out.push(char::REPLACEMENT_CHARACTER);
                    }
                    _ => out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)),
                }
            }
            // `\"`, `\'`, `\\` and anything else: the backslash is dropped.
            other => out.push(other),
        }
    }

    Ok(Cow::Owned(out))
}

/// Parse exactly four hex digits at the start of `s`.
fn hex4(s: &str) -> Option<u16> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

fn unpaired(unit: u16, offset: usize) -> EscapeError {
    EscapeError {
        sequence: format!("\\u{unit:04X}"),
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_is_unchanged() {
        assert!(matches!(decode("plain"), Cow::Borrowed("plain")));
        assert!(matches!(decode(r"C:\path\n"), Cow::Borrowed(r"C:\path\n")));
    }

    #[test]
    fn test_quotes_are_stripped() {
        assert_eq!(decode(r#""hello world""#), "hello world");
        assert_eq!(decode("'single'"), "single");
        assert_eq!(decode(r#""""#), "");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(decode(r#""hello\nworld""#), "hello\nworld");
        assert_eq!(decode(r#""a\tb\rc""#), "a\tb\rc");
        assert_eq!(decode(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(decode(r#"'it\'s'"#), "it's");
        assert_eq!(decode(r#""back\\slash""#), "back\\slash");
    }

    #[test]
    fn test_unknown_escape_keeps_character() {
        assert_eq!(decode(r#""\q\z\{""#), "qz{");
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(decode(r#""\u0041""#), "A");
        assert_eq!(decode(r#""\u00e9t\u00E9""#), "été");
        assert_eq!(decode(r#""\uD83D\uDE00""#), "\u{1F600}");
    }

    #[test]
    fn test_short_unicode_escape() {
        assert_eq!(decode(r#""\u12""#), "u12");
        assert_eq!(decode(r#""\uzzzz""#), "uzzzz");
        let err = decode_strict(r#""ab\u12""#).unwrap_err();
        assert_eq!(err.sequence, "\\u12");
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_unpaired_surrogate() {
        assert_eq!(decode(r#""\uD83Dx""#), "\u{FFFD}x");
        assert_eq!(decode(r#""\uDE00""#), "\u{FFFD}");
        let err = decode_strict(r#""\uDE00""#).unwrap_err();
        assert_eq!(err.sequence, "\\uDE00");
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_lone_trailing_backslash() {
        // Only reachable with a malformed span; the backslash survives.
        assert_eq!(decode(r#""abc\"#), "abc\\");
    }

    #[test]
    fn test_missing_closing_quote_keeps_last_char() {
        assert_eq!(decode(r#""abc"#), "abc");
        assert_eq!(decode(r#"'abc""#), "abc\"");
    }

    #[test]
    fn test_strict_accepts_valid_input() {
        assert_eq!(decode_strict(r#""a\u0042c""#).unwrap(), "aBc");
        assert_eq!(decode_strict("bare").unwrap(), "bare");
    }
}
