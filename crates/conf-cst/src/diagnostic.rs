//! Diagnostic rendering for parse errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use conf_scan::{ParseErrorKind, ScanError, Span};

/// A fatal parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Byte offset where the error occurred.
    pub fn offset(&self) -> u32 {
        self.span.start
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();

        match &self.kind {
            ParseErrorKind::UnterminatedQuote => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unterminated string")
                .with_label(
                    Label::new((filename, range))
                        .with_message("string opened here is never closed")
                        .with_color(Color::Red),
                )
                .with_help("add the matching closing quote; a quote preceded by '\\' does not close the string"),

            ParseErrorKind::MissingClosingBrace => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unclosed block")
                .with_label(
                    Label::new((filename, range))
                        .with_message("input ends here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing '}'"),

            ParseErrorKind::EqualsWithoutKey => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("'=' without a key")
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected a key before this")
                        .with_color(Color::Red),
                )
                .with_help("write `key = value`"),

            ParseErrorKind::EmptyUnquotedString => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("expected a string")
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected a string here")
                        .with_color(Color::Red),
                ),

            ParseErrorKind::MissingValue => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("missing value")
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected a string or '{' here")
                        .with_color(Color::Red),
                )
                .with_help("quote the value to use an empty string: key = \"\""),

            ParseErrorKind::NestingTooDeep { limit } => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("blocks nested too deeply")
                .with_label(
                    Label::new((filename, range))
                        .with_message(format!("this block is more than {limit} levels deep"))
                        .with_color(Color::Red),
                ),

            ParseErrorKind::InvalidEscape(seq) => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("invalid escape sequence '{}'", seq))
                .with_label(
                    Label::new((filename, range))
                        .with_message("invalid escape")
                        .with_color(Color::Red),
                )
                .with_help("\\u must be followed by four hex digits, and surrogates must come in pairs"),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind.message(), self.span.start)
    }
}

impl std::error::Error for ParseError {}

impl From<ScanError> for ParseError {
    fn from(error: ScanError) -> Self {
        Self::new(error.kind, error.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn strip(rendered: String) -> String {
        String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
    }

    #[test]
    fn test_display_includes_offset() {
        let err = parse("a = 1\n= b").unwrap_err();
        assert_eq!(err.to_string(), "'=' without a key at offset 6");
    }

    #[test]
    fn test_unterminated_quote_diagnostic() {
        let source = "name = \"hello";
        let err = parse(source).unwrap_err();
        let rendered = strip(err.render("app.conf", source));
        assert!(rendered.contains("unterminated string"), "{rendered}");
        assert!(rendered.contains("app.conf"), "{rendered}");
        assert!(rendered.contains("string opened here is never closed"), "{rendered}");
    }

    #[test]
    fn test_unclosed_block_diagnostic() {
        let source = "server {\n  host = localhost";
        let err = parse(source).unwrap_err();
        let rendered = strip(err.render("app.conf", source));
        assert!(rendered.contains("unclosed block"), "{rendered}");
        assert!(rendered.contains("add a closing '}'"), "{rendered}");
    }

    #[test]
    fn test_nesting_too_deep_diagnostic() {
        let source = "a{".repeat(300);
        let err = parse(&source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "blocks nested deeper than 256 levels at offset 513"
        );
        let rendered = strip(err.render("deep.conf", &source));
        assert!(rendered.contains("blocks nested too deeply"), "{rendered}");
    }

    #[test]
    fn test_invalid_escape_diagnostic() {
        let source = r#"path = "C:\users""#;
        let doc = parse(source).unwrap();
        let err = doc.get("path").unwrap().as_string().unwrap().try_text().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape("\\users".to_string()));
        assert_eq!(err.span, Span::new(10, 16));
        let rendered = strip(err.render("app.conf", source));
        assert!(rendered.contains("invalid escape sequence"), "{rendered}");
    }
}
