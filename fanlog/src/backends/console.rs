//! Tagged, timestamped line writer over any `io::Write`.
//!
//! The writer handed to [`Console::new`] is not closed by
//! [`close`](crate::backend::Backend::close); it remains the caller's
//! resource. Close flushes it.

use crate::attrib::{self, AttribStore};
use crate::backend::{Backend, Message};
use crate::error::BackendError;
use crate::level::Level;
use chrono::Local;
use std::io::{self, Write};
use std::sync::Mutex;

/// Tag prepended to DEBUG lines.
pub const TAG_DEBUG: &str = "DEBUG: ";
/// Tag prepended to INFO lines.
pub const TAG_INFO: &str = "INFO: ";
/// Tag prepended to WARNING lines.
pub const TAG_WARNING: &str = "WARN: ";
/// Tag prepended to ERROR lines.
pub const TAG_ERROR: &str = "ERROR: ";
/// Tag prepended to FATAL lines.
pub const TAG_FATAL: &str = "FATAL: ";

/// Console backend: renders `TAG timestamp text` lines to a writer.
pub struct Console {
    writer: Mutex<Box<dyn Write + Send>>,
    timestamps: bool,
}

impl Console {
    /// Wrap an arbitrary writer. Timestamps are on by default.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            timestamps: true,
        }
    }

    /// Console over standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Console over standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Enable or disable the timestamp column.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    fn tag(level: Level) -> &'static str {
        match level {
            Level::DEBUG => TAG_DEBUG,
            Level::INFO => TAG_INFO,
            Level::WARNING => TAG_WARNING,
            Level::ERROR => TAG_ERROR,
            Level::FATAL => TAG_FATAL,
            _ => TAG_INFO,
        }
    }
}

impl Backend for Console {
    fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a> {
        Box::new(ConsoleMessage {
            parent: self,
            level,
            text: text.to_string(),
        })
    }

    fn close(&self) -> Result<(), BackendError> {
        self.writer.lock().unwrap().flush()?;
        Ok(())
    }
}

struct ConsoleMessage<'a> {
    parent: &'a Console,
    level: Level,
    text: String,
}

impl Message for ConsoleMessage<'_> {
    fn compose(&mut self, attribs: &AttribStore) -> Result<(), BackendError> {
        // The console renders no call-site column, but the depth directive is
        // part of the contract and must be well-formed.
        attribs.get::<usize>(attrib::DEPTH)?;
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        let mut line = String::with_capacity(self.text.len() + 32);
        line.push_str(Console::tag(self.level));
        if self.parent.timestamps {
            line.push_str(&Local::now().format("%Y/%m/%d %H:%M:%S").to_string());
            line.push(' ');
        }
        line.push_str(&self.text);
        line.push('\n');

        let mut writer = self.parent.writer.lock().unwrap();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }
}
