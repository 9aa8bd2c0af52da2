//! Operation handler that reports what each operation would do.
//!
//! The network and clipboard backends live outside this crate; this handler
//! describes the resolved action so the front end can be exercised on its own.

use std::io::Write;

use itertools::Itertools;
use lemonade_core::dispatch::OperationHandler;
use lemonade_core::error::{Error, Result};
use lemonade_core::options::{Configuration, LineEnding};

/// Writes a one-line description of each operation to `out`.
pub struct Preview<W: Write> {
    out: W,
}

impl<W: Write> Preview<W> {
    /// Creates a handler that reports to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer, with everything reported so far.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").map_err(|e| Error::handler(format!("Error writing output: {e}")))
    }
}

fn endpoint(config: &Configuration) -> String {
    format!("{}:{}", config.host(), config.port())
}

fn line_ending_note(line_ending: LineEnding) -> String {
    match line_ending {
        LineEnding::None => String::new(),
        line_ending => format!(" (line endings: {line_ending})"),
    }
}

impl<W: Write> OperationHandler for Preview<W> {
    fn open(&mut self, config: &Configuration) -> Result<()> {
        let mut text = format!("Open `{}` via {}", config.data_source(), endpoint(config));
        if config.translate_loopback() {
            text.push_str(", translating loopback addresses");
        }
        if config.translate_local_file() {
            text.push_str(", sending local files");
        }
        self.line(&text)
    }

    fn paste(&mut self, config: &Configuration) -> Result<()> {
        let text = format!(
            "Paste from {}{}",
            endpoint(config),
            line_ending_note(config.line_ending())
        );
        self.line(&text)
    }

    fn copy(&mut self, config: &Configuration) -> Result<()> {
        let payload = config.line_ending().convert(config.data_source());
        let text = format!(
            "Copy {} bytes to {}{}",
            payload.len(),
            endpoint(config),
            line_ending_note(config.line_ending())
        );
        self.line(&text)
    }

    fn server(&mut self, config: &Configuration) -> Result<()> {
        let text = format!(
            "Serve on port {} for {}",
            config.port(),
            config.allow_ranges().join(", ")
        );
        self.line(&text)
    }
}
