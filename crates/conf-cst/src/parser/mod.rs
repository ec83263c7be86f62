//! Recursive-descent content parser.
//!
//! Grammar, informally:
//!
//! ```text
//! content  ::= (ws | comment | sep | object | item)*
//! object   ::= string? ws? '{' content '}'
//! item     ::= string ws? ('=' ws? (string ws? | object))?
//! ```
//!
//! A leading string is ambiguous until the character after it is known:
//! `=` makes it a key, `{` makes it an object name, anything else leaves it
//! a bare string. After `key =` the same lookahead decides between a string
//! value and a named object value. Nothing is ever re-scanned.

use conf_scan::{Lexeme, ParseErrorKind, Scanner, Span, starts_string};
use tracing::debug;

use crate::node::{KeyValuePair, Node, ObjectValue, StringValue, Trivia, Value};
use crate::{Document, ParseError};


/// Deepest block nesting accepted. The parser recurses once per block, so
/// this bounds its stack use.
pub const MAX_NESTING: usize = 256;

/// Parse a whole conf document into a lossless CST.
pub fn parse(source: &str) -> Result<Document<'_>, ParseError> {
    ContentParser::new(source).parse()
}

struct ContentParser<'src> {
    scanner: Scanner<'src>,
    /// Blocks currently open.
    depth: usize,
}

impl<'src> ContentParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            scanner: Scanner::new(source),
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Document<'src>, ParseError> {
        let content = self.read_content()?;
        let end = self.scanner.position();
        if !self.scanner.is_eof() {
            // Only a stray `}` stops the top level early.
            debug!(offset = end, "stray '}}' ends the document");
        }
        Ok(Document::new(self.scanner.source(), content, end))
    }

    /// Read items until end of input or a `}`, which is left unconsumed.
    fn read_content(&mut self) -> Result<Vec<Node<'src>>, ParseError> {
        let mut content = Vec::new();

        while let Some(c) = self.scanner.peek() {
            match c {
                '}' => break,
                ' ' | '\t' | '\r' | '\n' => {
                    content.push(Node::WhiteSpace(self.scanner.read_whitespace().into()));
                }
                '{' => {
                    let start = self.scanner.position();
                    let object = self.read_object(None, Trivia::new("", Span::empty(start)))?;
                    content.push(Node::Object(object));
                }
                ';' | ',' => {
                    if let Some(sep) = self.scanner.bump() {
                        content.push(Node::Separator(sep.into()));
                    }
                }
                '=' => {
                    let pos = self.scanner.position();
                    return Err(ParseError::new(
                        ParseErrorKind::EqualsWithoutKey,
                        Span::new(pos, pos + 1),
                    ));
                }
                '#' => {
                    content.push(Node::Comment(self.scanner.read_comment().into()));
                }
                _ => self.read_item(&mut content)?,
            }
        }

        Ok(content)
    }

    /// Read a string and decide from what follows whether it is a key, an
    /// object name or a bare string. May push a trailing whitespace node
    /// after the item itself.
    fn read_item(&mut self, content: &mut Vec<Node<'src>>) -> Result<(), ParseError> {
        let (string, ws1) = self.scanner.read_string_and_whitespace()?;
        let string = to_string_value(string);

        match self.scanner.peek() {
            Some('=') => {
                self.scanner.bump();
                let ws2 = self.scanner.read_whitespace();
                let span = ws1.span.extend(ws2.span);
                let equals = Trivia::new(span.slice(self.scanner.source()), span);

                let (value, trailing) = self.read_value()?;
                content.push(Node::KeyValue(KeyValuePair::new(string, equals, value)));
                if let Some(ws) = trailing {
                    content.push(Node::WhiteSpace(ws.into()));
                }
            }
            Some('{') => {
                let object = self.read_object(Some(string), ws1.into())?;
                content.push(Node::Object(object));
            }
            _ => {
                content.push(Node::String(string));
                if !ws1.is_empty() {
                    content.push(Node::WhiteSpace(ws1.into()));
                }
            }
        }

        Ok(())
    }

    /// Read what follows `key =`. A string value hands back the whitespace
    /// after it so the caller can emit it after the pair.
    fn read_value(&mut self) -> Result<(Value<'src>, Option<Lexeme<'src>>), ParseError> {
        match self.scanner.peek() {
            Some('{') => {
                let start = self.scanner.position();
                let object = self.read_object(None, Trivia::new("", Span::empty(start)))?;
                Ok((Value::Object(object), None))
            }
            Some(c) if starts_string(c) => {
                let (string, ws3) = self.scanner.read_string_and_whitespace()?;
                let string = to_string_value(string);
                if self.scanner.peek() == Some('{') {
                    let object = self.read_object(Some(string), ws3.into())?;
                    Ok((Value::Object(object), None))
                } else {
                    let trailing = (!ws3.is_empty()).then_some(ws3);
                    Ok((Value::String(string), trailing))
                }
            }
            _ => Err(ParseError::new(
                ParseErrorKind::MissingValue,
                Span::empty(self.scanner.position()),
            )),
        }
    }

    /// Read `{ content }` at the cursor and wrap it with its name.
    fn read_object(
        &mut self,
        name: Option<StringValue<'src>>,
        leading: Trivia<'src>,
    ) -> Result<ObjectValue<'src>, ParseError> {
        let start = name.map_or(leading.span().start, |n| n.span().start);
        let content = self.read_curly_brackets()?;
        let span = Span::new(start, self.scanner.position());
        Ok(ObjectValue::new(name, leading, content, span))
    }

    /// Consume `{`, the block's content, and the matching `}`.
    fn read_curly_brackets(&mut self) -> Result<Vec<Node<'src>>, ParseError> {
        debug_assert_eq!(self.scanner.peek(), Some('{'));
        let open = self.scanner.position();
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
                Span::new(open, open + 1),
            ));
        }
        self.scanner.bump();

        self.depth += 1;
        let content = self.read_content()?;
        self.depth -= 1;

        if self.scanner.peek() != Some('}') {
            return Err(ParseError::new(
                ParseErrorKind::MissingClosingBrace,
                Span::empty(self.scanner.position()),
            ));
        }
        self.scanner.bump();

        Ok(content)
    }
}

fn to_string_value(lexeme: Lexeme<'_>) -> StringValue<'_> {
    StringValue::new(lexeme.text, lexeme.span)
}
