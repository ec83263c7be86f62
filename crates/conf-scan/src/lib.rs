//! Primitive scanner for the conf configuration language.
//!
//! The scanner reads the smallest lexical units of a document (whitespace
//! runs, line comments, quoted and unquoted strings) off a cursor into the
//! whole input. It never builds a tree; `conf-cst` drives it.

mod error;
pub use error::{ParseErrorKind, ScanError};

mod span;
pub use span::Span;

mod scanner;
pub use scanner::{Lexeme, Scanner, is_forbidden, is_whitespace, starts_string};
