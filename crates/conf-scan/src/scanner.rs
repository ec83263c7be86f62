//! Cursor-based scanner over a whole conf document.

use crate::{ParseErrorKind, ScanError, Span};
use tracing::trace;

/// A raw slice of the input together with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'src> {
    /// The exact source text.
    pub text: &'src str,
    /// The span in the source text.
    pub span: Span,
}

impl<'src> Lexeme<'src> {
    /// Create a new lexeme.
    pub fn new(text: &'src str, span: Span) -> Self {
        Self { text, span }
    }

    /// Whether no input was consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A scanner that reads lexical units from conf source text.
///
/// The scanner owns the cursor; every read starts at the current position
/// and leaves the cursor right after what it consumed.
#[derive(Clone)]
pub struct Scanner<'src> {
    /// The source text being scanned.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// The whole source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The unconsumed rest of the input.
    #[inline]
    pub fn rest(&self) -> &'src str {
        self.remaining
    }

    /// Peek at the next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Create a lexeme from the given start position to current position.
    fn lexeme(&self, what: &'static str, start: u32) -> Lexeme<'src> {
        let text = &self.source[start as usize..self.pos as usize];
        let span = Span::at(start, text);
        trace!("{what}@{span} {text:?}");
        Lexeme::new(text, span)
    }

    /// Consume exactly one character (a brace, `=`, or a separator).
    pub fn bump(&mut self) -> Option<Lexeme<'src>> {
        let start = self.pos;
        self.advance()?;
        Some(self.lexeme("Char", start))
    }

    /// Consume a maximal run of space, tab, CR and LF. Never fails; the
    /// result is empty when the cursor is not at whitespace.
    pub fn read_whitespace(&mut self) -> Lexeme<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_whitespace(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.lexeme("WhiteSpace", start)
    }

    /// Consume a `#` comment through its line terminator (CRLF counts as
    /// one) or through end of input. Returns an empty lexeme and consumes
    /// nothing when the cursor is not at `#`.
    pub fn read_comment(&mut self) -> Lexeme<'src> {
        let start = self.pos;
        if self.peek() != Some('#') {
            return self.lexeme("Comment", start);
        }
        self.advance();

        while let Some(c) = self.advance() {
            match c {
                '\n' => break,
                '\r' => {
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    break;
                }
                _ => {}
            }
        }

        self.lexeme("Comment", start)
    }

    /// Read a quoted or unquoted string and the whitespace that follows it.
    ///
    /// The string and the whitespace are returned separately; a quoted
    /// string's raw text always ends at its closing quote.
    pub fn read_string_and_whitespace(
        &mut self,
    ) -> Result<(Lexeme<'src>, Lexeme<'src>), ScanError> {
        let string = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.read_quoted(quote)?,
            _ => self.read_unquoted()?,
        };
        let whitespace = self.read_whitespace();
        Ok((string, whitespace))
    }

    /// Read `'...'` or `"..."`. A backslash escapes the character after it,
    /// so `\"` never closes a double-quoted string.
    fn read_quoted(&mut self, quote: char) -> Result<Lexeme<'src>, ScanError> {
        let start = self.pos;

        // Consume opening quote
        self.advance();

        loop {
            match self.advance() {
                None => {
                    return Err(ScanError::new(
                        ParseErrorKind::UnterminatedQuote,
                        Span::new(start, self.pos),
                    ));
                }
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }

        Ok(self.lexeme("QuotedString", start))
    }

    /// Read an unquoted string up to the next forbidden character.
    fn read_unquoted(&mut self) -> Result<Lexeme<'src>, ScanError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_forbidden(c) {
                break;
            }
            self.advance();
        }

        // Blanks are forbidden, so the run never carries trailing whitespace.
        if self.pos == start {
            return Err(ScanError::new(
                ParseErrorKind::EmptyUnquotedString,
                Span::empty(start),
            ));
        }

        Ok(self.lexeme("UnquotedString", start))
    }
}

/// Whitespace as far as conf is concerned: space, tab, CR, LF.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters that end an unquoted string.
#[inline]
pub fn is_forbidden(c: char) -> bool {
    is_whitespace(c) || matches!(c, '{' | '}' | '=' | ';' | ',' | '#' | '\'' | '"')
}

/// Whether a string (quoted or unquoted) can start at this character.
#[inline]
pub fn starts_string(c: char) -> bool {
    c == '"' || c == '\'' || !is_forbidden(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conf_testhelpers::setup;

    fn string_and_ws(source: &str) -> Result<(&str, &str), ParseErrorKind> {
        setup();
        let mut scanner = Scanner::new(source);
        scanner
            .read_string_and_whitespace()
            .map(|(s, ws)| (s.text, ws.text))
            .map_err(|e| e.kind)
    }

    #[test]
    fn test_whitespace_run() {
        let mut scanner = Scanner::new(" \t\r\n x");
        let ws = scanner.read_whitespace();
        assert_eq!(ws.text, " \t\r\n ");
        assert_eq!(ws.span, Span::new(0, 5));
        assert_eq!(scanner.peek(), Some('x'));
    }

    #[test]
    fn test_whitespace_empty() {
        let mut scanner = Scanner::new("x");
        let ws = scanner.read_whitespace();
        assert!(ws.is_empty());
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_comment_terminators() {
        let mut scanner = Scanner::new("# one\r\nrest");
        assert_eq!(scanner.read_comment().text, "# one\r\n");
        assert_eq!(scanner.rest(), "rest");

        let mut scanner = Scanner::new("# two\rrest");
        assert_eq!(scanner.read_comment().text, "# two\r");
        assert_eq!(scanner.rest(), "rest");

        let mut scanner = Scanner::new("# three\nrest");
        assert_eq!(scanner.read_comment().text, "# three\n");

        let mut scanner = Scanner::new("# to the end");
        assert_eq!(scanner.read_comment().text, "# to the end");
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_comment_not_at_hash() {
        let mut scanner = Scanner::new("key");
        assert!(scanner.read_comment().is_empty());
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_unquoted_stops_at_forbidden() {
        assert_eq!(string_and_ws("key = value"), Ok(("key", " ")));
        assert_eq!(string_and_ws("a=1"), Ok(("a", "")));
        assert_eq!(string_and_ws("name{"), Ok(("name", "")));
        assert_eq!(string_and_ws("x;y"), Ok(("x", "")));
        assert_eq!(string_and_ws("x#c"), Ok(("x", "")));
        assert_eq!(string_and_ws("path/to/file.txt\n\n"), Ok(("path/to/file.txt", "\n\n")));
        assert_eq!(string_and_ws("héllo wörld"), Ok(("héllo", " ")));
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(string_and_ws(r#""hello world"  x"#), Ok((r#""hello world""#, "  ")));
        assert_eq!(string_and_ws("'single' "), Ok(("'single'", " ")));
        assert_eq!(string_and_ws(r#""say \"hi\"""#), Ok((r#""say \"hi\"""#, "")));
        // The other quote character does not terminate.
        assert_eq!(string_and_ws(r#"'it"s'"#), Ok((r#"'it"s'"#, "")));
        assert_eq!(string_and_ws(r#""back\\"x"#), Ok((r#""back\\""#, "")));
    }

    #[test]
    fn test_quoted_does_not_absorb_following_string() {
        let mut scanner = Scanner::new(r#""a"b"#);
        let (s, ws) = scanner.read_string_and_whitespace().unwrap();
        assert_eq!(s.text, r#""a""#);
        assert!(ws.is_empty());
        assert_eq!(scanner.rest(), "b");
    }

    #[test]
    fn test_unterminated_quote() {
        setup();
        let mut scanner = Scanner::new(r#"  "unterminated"#);
        scanner.read_whitespace();
        let err = scanner.read_string_and_whitespace().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedQuote);
        assert_eq!(err.span, Span::new(2, 15));

        assert_eq!(
            string_and_ws(r#""escaped end\""#),
            Err(ParseErrorKind::UnterminatedQuote)
        );
        assert_eq!(string_and_ws(r#""dangling\"#), Err(ParseErrorKind::UnterminatedQuote));
    }

    #[test]
    fn test_empty_unquoted_is_an_error() {
        for source in ["=", "{", "}", ";", ",", "#", " ", ""] {
            assert_eq!(
                string_and_ws(source),
                Err(ParseErrorKind::EmptyUnquotedString),
                "source: {source:?}"
            );
        }
    }

    #[test]
    fn test_bump() {
        let mut scanner = Scanner::new("é=");
        let lexeme = scanner.bump().unwrap();
        assert_eq!(lexeme.text, "é");
        assert_eq!(lexeme.span, Span::new(0, 2));
        assert_eq!(scanner.bump().unwrap().text, "=");
        assert!(scanner.bump().is_none());
    }

    #[test]
    fn test_starts_string() {
        assert!(starts_string('a'));
        assert!(starts_string('"'));
        assert!(starts_string('\''));
        assert!(starts_string('/'));
        assert!(!starts_string('{'));
        assert!(!starts_string('='));
        assert!(!starts_string(' '));
    }
}
