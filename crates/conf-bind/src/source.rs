//! Where settings come from: a file next to the executable and the command
//! line.

use std::io;
use std::path::{Path, PathBuf};

use conf_cst::{Document, ParseError, is_forbidden};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{BindError, Bindings};

/// Origin name used for settings given on the command line.
const COMMAND_LINE: &str = "<command line>";

/// A settings source that could not be read, parsed or applied.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{origin}: {error}")]
    Parse {
        /// File path or `<command line>`.
        origin: String,
        /// The text that failed to parse, kept for diagnostics.
        text: String,
        #[source]
        error: ParseError,
    },
    #[error("{origin}: {error}")]
    Bind {
        origin: String,
        #[source]
        error: BindError,
    },
}

impl LoadError {
    /// Render the error for a terminal. Parse errors get a source-annotated
    /// report.
    pub fn render(&self) -> String {
        match self {
            LoadError::Parse {
                origin,
                text,
                error,
            } => error.render(origin, text),
            other => format!("error: {other}\n"),
        }
    }
}

/// `<exe dir>/<exe stem>.conf` for the running executable.
pub fn app_config_path() -> io::Result<PathBuf> {
    Ok(std::env::current_exe()?.with_extension("conf"))
}

/// Join arguments into one conf document, one item per argument.
///
/// Arguments that would not scan as a single unquoted string are quoted. For
/// `key=value` arguments with a plain key only the value is quoted, so the
/// pair still binds.
pub fn join_command_line<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for arg in args {
        let arg = arg.as_ref();
        if !line.is_empty() {
            line.push(' ');
        }
        match arg.split_once('=') {
            Some((key, value)) if is_plain(key) => {
                line.push_str(key);
                line.push('=');
                push_item(&mut line, value);
            }
            _ => push_item(&mut line, arg),
        }
    }
    line
}

fn is_plain(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(is_forbidden)
}

fn push_item(line: &mut String, text: &str) {
    if is_plain(text) {
        line.push_str(text);
        return;
    }
    line.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            line.push('\\');
        }
        line.push(c);
    }
    line.push('"');
}

/// Parse `text` and apply it to `bindings`. `origin` names the source in
/// errors.
pub fn apply_source(
    origin: &str,
    text: &str,
    bindings: &mut Bindings<'_>,
) -> Result<usize, LoadError> {
    let doc = Document::parse(text).map_err(|error| LoadError::Parse {
        origin: origin.to_owned(),
        text: text.to_owned(),
        error,
    })?;
    if doc.is_truncated() {
        warn!(
            origin,
            offset = doc.end(),
            "stray '}}' ends the settings; the rest is ignored"
        );
    }

    let applied = bindings.apply(&doc).map_err(|error| LoadError::Bind {
        origin: origin.to_owned(),
        error,
    })?;
    debug!(origin, applied, "applied settings");
    Ok(applied)
}

/// Read the file at `path` and apply it to `bindings`.
pub fn load_file(path: &Path, bindings: &mut Bindings<'_>) -> Result<usize, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    apply_source(&path.display().to_string(), &text, bindings)
}

/// Apply [`app_config_path`] if it exists, then the process arguments.
///
/// Command-line settings are applied last and override the file.
pub fn load_app_config(bindings: &mut Bindings<'_>) -> Result<usize, LoadError> {
    let mut applied = 0;

    match app_config_path() {
        Ok(path) if path.is_file() => {
            debug!(path = %path.display(), "found settings file");
            applied += load_file(&path, bindings)?;
        }
        Ok(path) => debug!(path = %path.display(), "no settings file"),
        Err(e) => debug!(error = %e, "cannot locate the executable; skipping settings file"),
    }

    let line = join_command_line(std::env::args().skip(1));
    if !line.is_empty() {
        debug!(%line, "applying command line");
        applied += apply_source(COMMAND_LINE, &line, bindings)?;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conf_testhelpers::setup;

    #[test]
    fn test_join_plain_arguments() {
        assert_eq!(join_command_line(["port=80", "verbose"]), "port=80 verbose");
        assert_eq!(join_command_line(Vec::<String>::new()), "");
    }

    #[test]
    fn test_join_quotes_values_only() {
        assert_eq!(
            join_command_line(["name=edge one", "motd=say \"hi\"", "empty="]),
            r#"name="edge one" motd="say \"hi\"" empty="""#
        );
    }

    #[test]
    fn test_join_quotes_whole_argument() {
        assert_eq!(
            join_command_line(["two words", r"C:\dir x", "=v", "{"]),
            r#""two words" "C:\\dir x" "=v" "{""#
        );
    }

    #[test]
    fn test_joined_line_binds() {
        setup();
        let line = join_command_line(["--flag", "name=edge one", r"dir=C:\a b", "port=9"]);
        let mut name = String::new();
        let mut dir = PathBuf::new();
        let mut port = 0u16;
        let mut bindings = Bindings::new();
        bindings
            .field("name", &mut name)
            .field("dir", &mut dir)
            .field("port", &mut port);
        assert_eq!(apply_source(COMMAND_LINE, &line, &mut bindings).unwrap(), 3);
        drop(bindings);

        assert_eq!(name, "edge one");
        assert_eq!(dir, PathBuf::from(r"C:\a b"));
        assert_eq!(port, 9);
    }

    #[test]
    fn test_parse_error_keeps_origin() {
        setup();
        let mut bindings = Bindings::new();
        let err = apply_source("app.conf", "a { b = 1", &mut bindings).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.to_string(), "app.conf: '}' expected at offset 9");

        let rendered = err.render();
        let plain = String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap();
        assert!(plain.contains("app.conf"), "{plain}");
        assert!(plain.contains("unclosed block"), "{plain}");
    }

    #[test]
    fn test_bind_error_keeps_origin() {
        setup();
        let mut port = 0u16;
        let mut bindings = Bindings::new();
        bindings.field("port", &mut port);
        let err = apply_source(COMMAND_LINE, "prot=1", &mut bindings).unwrap_err();
        assert!(
            err.to_string().starts_with("<command line>: unknown key `prot`"),
            "{err}"
        );
    }

    #[test]
    fn test_load_missing_file() {
        setup();
        let path = std::env::temp_dir().join("conf-bind-test-does-not-exist.conf");
        let mut bindings = Bindings::new();
        let err = load_file(&path, &mut bindings).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_app_config_path_sits_next_to_exe() {
        let path = app_config_path().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.parent(), exe.parent());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("conf"));
    }
}
