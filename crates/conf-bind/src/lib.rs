//! Bind parsed conf documents onto program settings.
//!
//! There is no reflection: the caller lists the settings it accepts in a
//! [`Bindings`] table, and each top-level `key = value` pair is decoded,
//! converted with [`FromConf`], and stored in the matching slot.
//!
//! ```
//! use std::time::Duration;
//! use conf_bind::Bindings;
//! use conf_cst::Document;
//!
//! let mut port: u16 = 80;
//! let mut timeout = Duration::ZERO;
//! let mut name = String::new();
//!
//! let doc = Document::parse("port = 8080\ntimeout = 00:01:30\nname = 'edge 1'").unwrap();
//! let mut bindings = Bindings::new();
//! bindings
//!     .field("port", &mut port)
//!     .field("timeout", &mut timeout)
//!     .field("name", &mut name);
//! bindings.apply(&doc).unwrap();
//! drop(bindings);
//!
//! assert_eq!(port, 8080);
//! assert_eq!(timeout, Duration::from_secs(90));
//! assert_eq!(name, "edge 1");
//! ```

mod bindings;
mod convert;
mod source;

pub use bindings::{BindError, Bindings};
pub use convert::{ConvertError, FromConf, parse_duration};
pub use source::{
    LoadError, app_config_path, apply_source, join_command_line, load_app_config, load_file,
};
