//! The field table and the routine that applies a document to it.

use conf_cst::{Document, Node, ParseError, Span, Value};
use thiserror::Error;
use tracing::trace;

use crate::{ConvertError, FromConf};

/// Why a document could not be applied to a [`Bindings`] table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The key names no field in the table.
    #[error("unknown key `{key}` at offset {}; known keys: {}", span.start, known.join(", "))]
    UnknownKey {
        /// The decoded key.
        key: String,
        /// Where the key was written.
        span: Span,
        /// Every field name in the table, in registration order.
        known: Vec<String>,
    },
    /// The value did not convert to the field's type.
    #[error("invalid value `{value}` for `{key}` at offset {}: {source}", span.start)]
    InvalidValue {
        /// The decoded key.
        key: String,
        /// The decoded value.
        value: String,
        /// Where the value was written.
        span: Span,
        /// What the conversion reported.
        source: ConvertError,
    },
    /// A `{ }` block was given to a field that takes a single value.
    #[error("`{key}` at offset {} expects a value, found a block", span.start)]
    ExpectedString {
        /// The decoded key.
        key: String,
        /// Where the block was written.
        span: Span,
    },
    /// A key or value holds an escape that cannot be decoded.
    #[error(transparent)]
    Escape(#[from] ParseError),
}

trait Slot {
    fn assign(&mut self, text: &str) -> Result<(), ConvertError>;
}

impl<T: FromConf> Slot for &mut T {
    fn assign(&mut self, text: &str) -> Result<(), ConvertError> {
        **self = T::from_conf(text)?;
        Ok(())
    }
}

/// A table from setting names to the variables that receive them.
///
/// The table mutably borrows every slot it holds; drop it (or let it go out
/// of scope) before reading the settings back.
#[derive(Default)]
pub struct Bindings<'a> {
    fields: Vec<(&'a str, Box<dyn Slot + 'a>)>,
}

impl<'a> Bindings<'a> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `slot` under `name`. A later registration of the same name
    /// replaces the earlier one.
    pub fn field<T: FromConf + 'a>(&mut self, name: &'a str, slot: &'a mut T) -> &mut Self {
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, Box::new(slot)));
        self
    }

    /// Registered field names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Whether no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Apply every top-level `key = value` pair of `doc`, in document order.
    ///
    /// Later duplicates overwrite earlier ones. Bare strings, comments and
    /// unkeyed blocks are skipped. Returns how many pairs were applied.
    pub fn apply(&mut self, doc: &Document<'_>) -> Result<usize, BindError> {
        self.apply_content(doc.content())
    }

    /// Like [`Bindings::apply`], for any content sequence (e.g. the inside
    /// of a block).
    pub fn apply_content(&mut self, content: &[Node<'_>]) -> Result<usize, BindError> {
        let mut applied = 0;

        for node in content {
            let Node::KeyValue(kv) = node else {
                if !node.is_trivia() {
                    trace!(kind = node.kind_name(), "skipping unkeyed item");
                }
                continue;
            };

            let key = kv.key().try_text()?;
            let Some(index) = self.fields.iter().position(|(name, _)| *name == key) else {
                return Err(BindError::UnknownKey {
                    key: key.into_owned(),
                    span: kv.key().span(),
                    known: self.names().map(str::to_owned).collect(),
                });
            };
            let slot = &mut self.fields[index].1;

            let value = match kv.value() {
                Value::String(s) => s,
                Value::Object(o) => {
                    return Err(BindError::ExpectedString {
                        key: key.into_owned(),
                        span: o.span(),
                    });
                }
            };
            let text = value.try_text()?;
            trace!(%key, value = %text, "binding field");

            slot.assign(&text).map_err(|source| BindError::InvalidValue {
                key: key.to_string(),
                value: text.to_string(),
                span: value.span(),
                source,
            })?;
            applied += 1;
        }

        Ok(applied)
    }
}

impl std::fmt::Debug for Bindings<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bindings")
            .field("fields", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
