//! The parsed document and lookups over its content.

use std::borrow::Cow;
use std::fmt;

use crate::node::{self, KeyValuePair, Node, ObjectValue, StringValue, Value};
use crate::{ParseError, parser};

/// A parsed conf document: the top-level content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'src> {
    source: &'src str,
    content: Vec<Node<'src>>,
    end: u32,
}

/// What a dotted path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, 'src> {
    /// A string value (`key = value`).
    String(&'a StringValue<'src>),
    /// A keyed or named block.
    Object(&'a ObjectValue<'src>),
}

impl<'a, 'src> Lookup<'a, 'src> {
    /// Logical text, if the path ended at a string.
    pub fn as_str(&self) -> Option<Cow<'src, str>> {
        match self {
            Lookup::String(s) => Some(s.text()),
            Lookup::Object(_) => None,
        }
    }

    /// The block, if the path ended at one.
    pub fn as_object(&self) -> Option<&'a ObjectValue<'src>> {
        match self {
            Lookup::Object(o) => Some(o),
            Lookup::String(_) => None,
        }
    }
}

impl<'src> Document<'src> {
    pub(crate) fn new(source: &'src str, content: Vec<Node<'src>>, end: u32) -> Self {
        Self {
            source,
            content,
            end,
        }
    }

    /// Parse a conf document.
    pub fn parse(source: &'src str) -> Result<Self, ParseError> {
        parser::parse(source)
    }

    /// The full input the document was parsed from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Top-level nodes, in document order.
    pub fn content(&self) -> &[Node<'src>] {
        &self.content
    }

    /// Take the top-level nodes.
    pub fn into_content(self) -> Vec<Node<'src>> {
        self.content
    }

    /// Top-level key/value pairs, in document order. Duplicate keys are all
    /// kept.
    pub fn entries(&self) -> impl Iterator<Item = &KeyValuePair<'src>> {
        node::entries(&self.content)
    }

    /// The value of the last top-level pair with this key, so later
    /// duplicates override earlier ones.
    pub fn get(&self, key: &str) -> Option<&Value<'src>> {
        self.entries()
            .filter(|kv| kv.key_text() == key)
            .last()
            .map(KeyValuePair::value)
    }

    /// Every top-level value with this key, in document order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value<'src>> + 'a {
        self.entries()
            .filter(move |kv| kv.key_text() == key)
            .map(KeyValuePair::value)
    }

    /// Resolve a dotted path such as `server.tls.cert`.
    ///
    /// Each segment matches a `key = ...` pair or a named block
    /// (`name { ... }`); the last match in a block wins.
    pub fn lookup(&self, path: &str) -> Option<Lookup<'_, 'src>> {
        let mut segments = path.split('.');
        let mut found = find(&self.content, segments.next()?)?;
        for segment in segments {
            found = find(found.as_object()?.content(), segment)?;
        }
        Some(found)
    }

    /// Byte offset where parsing stopped.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Whether a stray top-level `}` ended parsing before the end of input.
    pub fn is_truncated(&self) -> bool {
        (self.end as usize) < self.source.len()
    }

    /// Input left unparsed after a stray top-level `}` (starting with that
    /// `}`). Empty when the whole input was consumed.
    pub fn unparsed(&self) -> &'src str {
        &self.source[self.end as usize..]
    }

    /// Indented structural dump, one node per line.
    pub fn debug_tree(&self) -> String {
        node::TreeDump(&self.content).to_string()
    }
}

fn find<'a, 'src>(content: &'a [Node<'src>], segment: &str) -> Option<Lookup<'a, 'src>> {
    content
        .iter()
        .filter_map(|node| match node {
            Node::KeyValue(kv) if kv.key_text() == segment => Some(match kv.value() {
                Value::String(s) => Lookup::String(s),
                Value::Object(o) => Lookup::Object(o),
            }),
            Node::Object(o) if o.name_text().is_some_and(|name| name == segment) => {
                Some(Lookup::Object(o))
            }
            _ => None,
        })
        .last()
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.content {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
