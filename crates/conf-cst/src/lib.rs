//! Lossless concrete syntax tree for the conf configuration language.
//!
//! conf is a small curly-brace format of strings, `key = value` pairs and
//! nested `{ }` blocks, with `#` line comments. The parser in this crate
//! keeps every byte of the input (whitespace, comments, quoting as written)
//! so the original text can be reconstructed exactly, while still exposing
//! decoded values to consumers.
//!
//! # Example
//!
//! ```
//! use conf_cst::{Document, Value};
//!
//! let source = r#"
//! # where to listen
//! host = localhost
//! port = 8080
//! tls = cert { path = "/etc/ssl/cert.pem" }
//! "#;
//!
//! let doc = Document::parse(source).unwrap();
//! assert_eq!(doc.get("port").and_then(Value::as_str).as_deref(), Some("8080"));
//! assert_eq!(
//!     doc.lookup("tls.path").and_then(|l| l.as_str()).as_deref(),
//!     Some("/etc/ssl/cert.pem")
//! );
//!
//! // Roundtrip: source can be exactly reconstructed
//! assert_eq!(doc.to_string(), source);
//! ```

mod diagnostic;
mod document;
pub mod escape;
mod node;
mod parser;

pub use conf_scan::{ParseErrorKind, Span, is_forbidden};
pub use diagnostic::ParseError;
pub use document::{Document, Lookup};
pub use node::{KeyValuePair, Node, ObjectValue, StringValue, Trivia, Value, entries};
pub use parser::{MAX_NESTING, parse};
