//! clipdown - convert a saved HTML selection to Markdown.
//!
//! Reads HTML from a file or stdin and writes the Markdown to stdout, to an
//! explicit path, or to a timestamped file.
//!
//! Usage:
//!  clipdown [INPUT]                 - print Markdown to stdout
//!  clipdown [INPUT] -o notes.md     - write to notes.md
//!  clipdown [INPUT] --save [--dir D] - write D/selection-YYYYMMDD-HHMMSS.md
//!
//! Logging goes to stderr; `RUST_LOG` overrides the level.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Convert browser-selected HTML into lint-clean Markdown
#[derive(Debug, Parser)]
#[command(name = "clipdown", author, version, about)]
struct Args {
    /// HTML file to convert; stdin when absent or `-`
    input: Option<PathBuf>,

    /// Write the Markdown to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Save as selection-YYYYMMDD-HHMMSS.md in --dir
    #[arg(long, conflicts_with = "output")]
    save: bool,

    /// Directory used by --save
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

/// Where the Markdown ends up
#[derive(Debug, PartialEq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Args {
    fn destination(&self, now: NaiveDateTime) -> Destination {
        match &self.output {
            Some(path) => Destination::File(path.clone()),
            None if self.save => Destination::File(self.dir.join(save_file_name(now))),
            None => Destination::Stdout,
        }
    }
}

/// File name used by `--save`
fn save_file_name(now: NaiveDateTime) -> String {
    now.format("selection-%Y%m%d-%H%M%S.md").to_string()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("failed to read HTML from stdin")?;
            Ok(html)
        }
    }
}

fn write_output(destination: &Destination, markdown: &str) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(markdown.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write Markdown to stdout")
        }
        Destination::File(path) => {
            fs::write(path, markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "saved markdown");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let html = read_input(args.input.as_deref())?;
    tracing::info!(bytes = html.len(), "read selection");

    let markdown = clipdown::convert(&html).context("failed to convert HTML")?;
    if markdown.trim().is_empty() {
        tracing::warn!("selection produced no Markdown");
    }

    let destination = args.destination(Local::now().naive_local());
    write_output(&destination, &markdown)
}
