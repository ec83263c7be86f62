//! Error kinds shared by the scanner and the content parser.

use crate::Span;

/// The kind of a fatal parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opening quote has no matching unescaped closing quote.
    UnterminatedQuote,
    /// A `{` was opened but the input ended before its `}`.
    MissingClosingBrace,
    /// `=` appeared where a content item was expected.
    EqualsWithoutKey,
    /// An unquoted string was requested at a character that cannot start one.
    EmptyUnquotedString,
    /// `key =` was not followed by a string or a `{` block.
    MissingValue,
    /// Blocks are nested deeper than the parser allows. The span covers the
    /// `{` that crossed the limit.
    NestingTooDeep {
        /// The deepest nesting the parser accepts.
        limit: usize,
    },
    /// A quoted string contains an escape that cannot be decoded.
    /// Only raised by strict decoding, never while parsing.
    InvalidEscape(String),
}

impl ParseErrorKind {
    /// Short human-readable description of this kind.
    pub fn message(&self) -> String {
        match self {
            ParseErrorKind::UnterminatedQuote => "closing quote is missing".to_string(),
            ParseErrorKind::MissingClosingBrace => "'}' expected".to_string(),
            ParseErrorKind::EqualsWithoutKey => "'=' without a key".to_string(),
            ParseErrorKind::EmptyUnquotedString => "expected a string".to_string(),
            ParseErrorKind::MissingValue => "string value or '{' block expected".to_string(),
            ParseErrorKind::NestingTooDeep { limit } => {
                format!("blocks nested deeper than {limit} levels")
            }
            ParseErrorKind::InvalidEscape(seq) => format!("invalid escape sequence '{seq}'"),
        }
    }
}

/// A scanner failure: what went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ScanError {
    /// Create a new scan error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind.message(), self.span.start)
    }
}

impl std::error::Error for ScanError {}
