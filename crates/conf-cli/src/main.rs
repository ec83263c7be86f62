//! `conf`: inspect conf configuration files.
//!
//! ```text
//! conf check app.conf            exit 1 with a diagnostic on a syntax error
//! conf cst app.conf              show the concrete syntax tree
//! conf get app.conf server.port  print the decoded value at a dotted path
//! conf json - < app.conf         structural JSON on stdout
//! conf args -- port=80 "x y"     parse arguments the way programs see them
//! ```

mod json;

use std::io::{self, Read};

use clap::{Parser, Subcommand};
use conf_cst::{Document, Lookup, ParseError};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_LOOKUP_MISS: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "conf", version, about = "Inspect conf configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check syntax; print a diagnostic and exit 1 on failure
    Check {
        /// Input file, or "-" for stdin
        file: String,
    },

    /// Show the concrete syntax tree
    Cst {
        /// Input file, or "-" for stdin
        file: String,
    },

    /// Print the decoded value at a dotted path (e.g. `server.port`)
    Get {
        /// Input file, or "-" for stdin
        file: String,

        /// Dotted path through keys and named blocks
        path: String,
    },

    /// Print the document as structural JSON
    Json {
        /// Input file, or "-" for stdin
        file: String,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Join arguments into a command line, parse it and show the tree
    Args {
        /// Arguments, as a program would receive them
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CONF_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "running");

    match run(cli.command) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Parse {
                    error,
                    source,
                    filename,
                } => error.write_report(filename, source, io::stderr()),
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Check { file } => run_check(&file),
        Command::Cst { file } => run_cst(&file),
        Command::Get { file, path } => run_get(&file, &path),
        Command::Json { file, compact } => run_json(&file, compact),
        Command::Args { args } => run_args(&args),
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io { path: String, error: io::Error },
    Parse {
        error: ParseError,
        source: String,
        filename: String,
    },
    NotFound(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => EXIT_IO_ERROR,
            CliError::Parse { .. } => EXIT_SYNTAX_ERROR,
            CliError::NotFound(_) => EXIT_LOOKUP_MISS,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io { path, error } => write!(f, "{path}: {error}"),
            CliError::Parse {
                error, filename, ..
            } => write!(f, "{filename}: {error}"),
            CliError::NotFound(path) => write!(f, "no value at `{path}`"),
        }
    }
}

// ============================================================================
// Subcommand implementations
// ============================================================================

/// An input file and its display name.
struct Input {
    filename: String,
    source: String,
}

impl Input {
    fn read(file: &str) -> Result<Self, CliError> {
        let source = read_input(file).map_err(|error| CliError::Io {
            path: file.to_owned(),
            error,
        })?;
        let filename = if file == "-" { "<stdin>" } else { file };
        Ok(Self {
            filename: filename.to_owned(),
            source,
        })
    }

    fn parse(&self) -> Result<Document<'_>, CliError> {
        let doc = Document::parse(&self.source).map_err(|error| CliError::Parse {
            error,
            source: self.source.clone(),
            filename: self.filename.clone(),
        })?;
        if doc.is_truncated() {
            warn!(
                file = %self.filename,
                offset = doc.end(),
                "stray '}}' ends the document; the rest is ignored"
            );
        }
        Ok(doc)
    }
}

fn run_check(file: &str) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let doc = input.parse()?;
    debug!(items = doc.content().len(), "document is well-formed");
    Ok(())
}

fn run_cst(file: &str) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let doc = input.parse()?;
    print!("{}", doc.debug_tree());
    if doc.is_truncated() {
        println!("Unparsed@{}..{}", doc.end(), input.source.len());
    }
    Ok(())
}

fn run_get(file: &str, path: &str) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let doc = input.parse()?;
    match doc.lookup(path) {
        Some(Lookup::String(s)) => println!("{}", s.text()),
        Some(Lookup::Object(o)) => println!("{o}"),
        None => return Err(CliError::NotFound(path.to_owned())),
    }
    Ok(())
}

fn run_json(file: &str, compact: bool) -> Result<(), CliError> {
    let input = Input::read(file)?;
    let doc = input.parse()?;
    let value = json::content_to_json(doc.content());
    let text = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
    .map_err(|e| CliError::Io {
        path: "<stdout>".to_owned(),
        error: io::Error::other(e),
    })?;
    println!("{text}");
    Ok(())
}

fn run_args(args: &[String]) -> Result<(), CliError> {
    let line = conf_bind::join_command_line(args);
    println!("{line}");
    let input = Input {
        filename: "<command line>".to_owned(),
        source: line,
    };
    let doc = input.parse()?;
    print!("{}", doc.debug_tree());
    Ok(())
}

fn read_input(file: &str) -> Result<String, io::Error> {
    match file {
        "-" => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        path => std::fs::read_to_string(path),
    }
}
