//! CST node definitions.
//!
//! Every node keeps the raw text it was read from. Writing the nodes of a
//! document back out in order (see the `Display` impls) reproduces the
//! consumed input byte for byte.

use std::borrow::Cow;
use std::fmt;

use conf_scan::{Lexeme, ParseErrorKind, Span};

use crate::ParseError;
use crate::escape;

/// Raw text without semantic value: whitespace, a comment or a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia<'src> {
    text: &'src str,
    span: Span,
}

impl<'src> Trivia<'src> {
    pub(crate) fn new(text: &'src str, span: Span) -> Self {
        Self { text, span }
    }

    /// The raw text.
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Where the text sits in the source.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Whether the trivia is empty (e.g. no whitespace before a `{`).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl<'src> From<Lexeme<'src>> for Trivia<'src> {
    fn from(lexeme: Lexeme<'src>) -> Self {
        Self::new(lexeme.text, lexeme.span)
    }
}

/// A quoted or unquoted string token.
///
/// The raw text is what round-trips; [`StringValue::text`] is what consumers
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringValue<'src> {
    raw: &'src str,
    span: Span,
}

impl<'src> StringValue<'src> {
    pub(crate) fn new(raw: &'src str, span: Span) -> Self {
        Self { raw, span }
    }

    /// The raw text, quotes and escapes included.
    pub fn raw(&self) -> &'src str {
        self.raw
    }

    /// Where the string sits in the source.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The quote character, if this is a quoted string.
    pub fn quote(&self) -> Option<char> {
        match self.raw.chars().next() {
            Some(q @ ('"' | '\'')) => Some(q),
            _ => None,
        }
    }

    /// Whether this string was written in quotes.
    pub fn is_quoted(&self) -> bool {
        self.quote().is_some()
    }

    /// The logical text. Unquoted strings are returned as written; malformed
    /// `\u` escapes are decoded leniently.
    pub fn text(&self) -> Cow<'src, str> {
        escape::decode(self.raw)
    }

    /// The logical text, failing on malformed `\u` escapes.
    pub fn try_text(&self) -> Result<Cow<'src, str>, ParseError> {
        escape::decode_strict(self.raw).map_err(|e| {
            let start = self.span.start + e.offset as u32;
            let end = (start + e.sequence.len() as u32).min(self.span.end);
            ParseError::new(
                ParseErrorKind::InvalidEscape(e.sequence),
                Span::new(start, end),
            )
        })
    }
}

impl fmt::Display for StringValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// A `{ ... }` block, optionally preceded by a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectValue<'src> {
    name: Option<StringValue<'src>>,
    leading: Trivia<'src>,
    content: Vec<Node<'src>>,
    span: Span,
}

impl<'src> ObjectValue<'src> {
    pub(crate) fn new(
        name: Option<StringValue<'src>>,
        leading: Trivia<'src>,
        content: Vec<Node<'src>>,
        span: Span,
    ) -> Self {
        Self {
            name,
            leading,
            content,
            span,
        }
    }

    /// The name written before the `{`, if any.
    pub fn name(&self) -> Option<&StringValue<'src>> {
        self.name.as_ref()
    }

    /// The logical text of the name, if any.
    pub fn name_text(&self) -> Option<Cow<'src, str>> {
        self.name.map(|name| name.text())
    }

    /// Whitespace between the name and the `{`.
    pub fn leading(&self) -> &Trivia<'src> {
        &self.leading
    }

    /// The nodes between the braces, in document order.
    pub fn content(&self) -> &[Node<'src>] {
        &self.content
    }

    /// Span from the name (or `{`) through the closing `}`.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Key/value pairs directly inside this block.
    pub fn entries(&self) -> impl Iterator<Item = &KeyValuePair<'src>> {
        entries(&self.content)
    }
}

impl fmt::Display for ObjectValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
        }
        f.write_str(self.leading.text)?;
        f.write_str("{")?;
        for node in &self.content {
            write!(f, "{node}")?;
        }
        f.write_str("}")
    }
}

/// The right-hand side of `key = ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'src> {
    /// `key = value`
    String(StringValue<'src>),
    /// `key = name { ... }` or `key = { ... }`
    Object(ObjectValue<'src>),
}

impl<'src> Value<'src> {
    /// The string value, if this is one.
    pub fn as_string(&self) -> Option<&StringValue<'src>> {
        match self {
            Value::String(s) => Some(s),
            Value::Object(_) => None,
        }
    }

    /// The object value, if this is one.
    pub fn as_object(&self) -> Option<&ObjectValue<'src>> {
        match self {
            Value::Object(o) => Some(o),
            Value::String(_) => None,
        }
    }

    /// Logical text of a string value.
    pub fn as_str(&self) -> Option<Cow<'src, str>> {
        self.as_string().map(StringValue::text)
    }

    /// Where the value sits in the source.
    pub fn span(&self) -> Span {
        match self {
            Value::String(s) => s.span(),
            Value::Object(o) => o.span(),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Object(o) => write!(f, "{o}"),
        }
    }
}

/// `key = value`, with the text around `=` kept as one raw run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair<'src> {
    key: StringValue<'src>,
    equals: Trivia<'src>,
    value: Value<'src>,
}

impl<'src> KeyValuePair<'src> {
    pub(crate) fn new(key: StringValue<'src>, equals: Trivia<'src>, value: Value<'src>) -> Self {
        Self { key, equals, value }
    }

    /// The key as written.
    pub fn key(&self) -> &StringValue<'src> {
        &self.key
    }

    /// The logical text of the key.
    pub fn key_text(&self) -> Cow<'src, str> {
        self.key.text()
    }

    /// Whitespace, `=`, whitespace.
    pub fn equals(&self) -> &Trivia<'src> {
        &self.equals
    }

    /// The value.
    pub fn value(&self) -> &Value<'src> {
        &self.value
    }

    /// Span from the key through the end of the value.
    pub fn span(&self) -> Span {
        self.key.span().extend(self.value.span())
    }
}

impl fmt::Display for KeyValuePair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.equals.text, self.value)
    }
}

/// One item of a document's or a block's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'src> {
    /// Run of space, tab, CR, LF.
    WhiteSpace(Trivia<'src>),
    /// `#` through end of line.
    Comment(Trivia<'src>),
    /// A single `;` or `,`.
    Separator(Trivia<'src>),
    /// A bare string.
    String(StringValue<'src>),
    /// A `{ ... }` block, named or anonymous.
    Object(ObjectValue<'src>),
    /// `key = value`
    KeyValue(KeyValuePair<'src>),
}

impl<'src> Node<'src> {
    /// Where the node sits in the source.
    pub fn span(&self) -> Span {
        match self {
            Node::WhiteSpace(t) | Node::Comment(t) | Node::Separator(t) => t.span(),
            Node::String(s) => s.span(),
            Node::Object(o) => o.span(),
            Node::KeyValue(kv) => kv.span(),
        }
    }

    /// Name of the variant, as shown in tree dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::WhiteSpace(_) => "WhiteSpace",
            Node::Comment(_) => "Comment",
            Node::Separator(_) => "Separator",
            Node::String(_) => "String",
            Node::Object(_) => "Object",
            Node::KeyValue(_) => "KeyValue",
        }
    }

    /// Whether this node carries no meaning (whitespace, comment, separator).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Node::WhiteSpace(_) | Node::Comment(_) | Node::Separator(_)
        )
    }

    /// The key/value pair, if this is one.
    pub fn as_key_value(&self) -> Option<&KeyValuePair<'src>> {
        match self {
            Node::KeyValue(kv) => Some(kv),
            _ => None,
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::WhiteSpace(t) | Node::Comment(t) | Node::Separator(t) => f.write_str(t.text),
            Node::String(s) => write!(f, "{s}"),
            Node::Object(o) => write!(f, "{o}"),
            Node::KeyValue(kv) => write!(f, "{kv}"),
        }
    }
}

/// Key/value pairs among `content`, in document order.
pub fn entries<'a, 'src>(
    content: &'a [Node<'src>],
) -> impl Iterator<Item = &'a KeyValuePair<'src>> {
    content.iter().filter_map(Node::as_key_value)
}

/// Indented structural dump of a content sequence, one node per line.
pub(crate) struct TreeDump<'a, 'src>(pub(crate) &'a [Node<'src>]);

impl fmt::Display for TreeDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self.0, 0, f)
    }
}

fn write_tree(content: &[Node<'_>], depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for node in content {
        write!(f, "{indent}{}@{}", node.kind_name(), node.span())?;
        match node {
            Node::WhiteSpace(t) | Node::Comment(t) | Node::Separator(t) => {
                writeln!(f, " {:?}", t.text)?;
            }
            Node::String(s) => writeln!(f, " {:?}", s.raw)?,
            Node::Object(o) => write_object(o, depth, f)?,
            Node::KeyValue(kv) => {
                writeln!(f, " key={:?} equals={:?}", kv.key.raw, kv.equals.text)?;
                write!(f, "{indent}  ")?;
                match &kv.value {
                    Value::String(s) => writeln!(f, "String@{} {:?}", s.span, s.raw)?,
                    Value::Object(o) => {
                        write!(f, "Object@{}", o.span)?;
                        write_object(o, depth + 1, f)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// The rest of an object's header line, then its content one level deeper.
fn write_object(object: &ObjectValue<'_>, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(name) = &object.name {
        write!(f, " name={:?}", name.raw)?;
    }
    if !object.leading.is_empty() {
        write!(f, " leading={:?}", object.leading.text)?;
    }
    writeln!(f)?;
    write_tree(&object.content, depth + 1, f)
}
