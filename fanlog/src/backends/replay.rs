//! In-memory recorder backend for replaying log messages.
//!
//! Records every message it receives and replays them on demand, which makes
//! it the deterministic-test companion of the facade: register a [`Replay`]
//! alongside real sinks (or on the global dispatcher), run the code under
//! test, then query what was logged. Appends are serialized by the backend's
//! own lock and preserve FIFO order.

use crate::attrib::AttribStore;
use crate::backend::{Backend, Message};
use crate::error::BackendError;
use crate::level::Level;
use regex::Regex;
use std::fmt;
use std::sync::Mutex;

/// Catch-all level for messages recorded at a level the replay backend does
/// not recognize as one of the standard five.
pub const DEFAULT: Level = Level(1000);

/// One recorded log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Level the message was recorded under.
    pub level: Level,
    /// Rendered message text.
    pub text: String,
}

impl Entry {
    /// Convenience constructor.
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.level, self.text)
    }
}

/// Snapshot of recorded entries returned by replay queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer(Vec<Entry>);

impl Buffer {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in record order.
    pub fn as_slice(&self) -> &[Entry] {
        &self.0
    }

    /// Iterate over entries in record order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// Whether any entry's text contains `needle` as a substring.
    pub fn contains_str(&self, needle: &str) -> bool {
        self.0.iter().any(|entry| entry.text.contains(needle))
    }

    /// Whether any entry's text matches `re`.
    pub fn contains_match(&self, re: &Regex) -> bool {
        self.0.iter().any(|entry| re.is_match(&entry.text))
    }
}

impl From<Vec<Entry>> for Buffer {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for Buffer {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Recorder backend.
#[derive(Debug, Default)]
pub struct Replay {
    records: Mutex<Vec<Entry>>,
}

impl Replay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&self, entry: Entry) {
        self.records.lock().unwrap().push(entry);
    }

    fn by_level(&self, level: Level) -> Buffer {
        let records = self.records.lock().unwrap();
        Buffer(
            records
                .iter()
                .filter(|entry| entry.level == level)
                .cloned()
                .collect(),
        )
    }

    /// All recorded messages, in call order.
    pub fn all(&self) -> Buffer {
        Buffer(self.records.lock().unwrap().clone())
    }

    /// Messages recorded at the DEBUG level.
    pub fn debug(&self) -> Buffer {
        self.by_level(Level::DEBUG)
    }

    /// Messages recorded at the INFO level.
    pub fn info(&self) -> Buffer {
        self.by_level(Level::INFO)
    }

    /// Messages recorded at the WARNING level.
    pub fn warning(&self) -> Buffer {
        self.by_level(Level::WARNING)
    }

    /// Messages recorded at the ERROR level.
    pub fn error(&self) -> Buffer {
        self.by_level(Level::ERROR)
    }

    /// Messages recorded at the FATAL level.
    pub fn fatal(&self) -> Buffer {
        self.by_level(Level::FATAL)
    }

    /// Discard everything recorded so far.
    pub fn reset(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl Backend for Replay {
    fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a> {
        Box::new(ReplayMessage {
            parent: self,
            level,
            text: text.to_string(),
        })
    }

    fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

struct ReplayMessage<'a> {
    parent: &'a Replay,
    level: Level,
    text: String,
}

impl Message for ReplayMessage<'_> {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        let level = match self.level {
            Level::DEBUG | Level::INFO | Level::WARNING | Level::ERROR | Level::FATAL => self.level,
            _ => DEFAULT,
        };
        self.parent
            .append(Entry::new(level, std::mem::take(&mut self.text)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(replay: &Replay, level: Level, text: &str) {
        let mut message = replay.message(level, text);
        message.compose(&AttribStore::new()).unwrap();
        message.write().unwrap();
    }

    #[test]
    fn test_level_queries_filter_in_order() {
        let replay = Replay::new();
        record(&replay, Level::INFO, "a");
        record(&replay, Level::ERROR, "b");
        record(&replay, Level::INFO, "c");

        assert_eq!(
            replay.info().as_slice(),
            &[
                Entry::new(Level::INFO, "a"),
                Entry::new(Level::INFO, "c"),
            ]
        );
        assert_eq!(replay.error().as_slice(), &[Entry::new(Level::ERROR, "b")]);
        assert_eq!(replay.all().len(), 3);
    }

    #[test]
    fn test_reset_empties_all_queries() {
        let replay = Replay::new();
        record(&replay, Level::INFO, "one");
        record(&replay, Level::WARNING, "two");
        replay.reset();
        assert!(replay.all().is_empty());
        assert!(replay.info().is_empty());
        assert!(replay.warning().is_empty());
    }

    #[test]
    fn test_unknown_level_is_recorded_under_default() {
        let replay = Replay::new();
        record(&replay, Level(999), "strange");
        assert_eq!(
            replay.all().as_slice(),
            &[Entry::new(DEFAULT, "strange")]
        );
        assert!(replay.info().is_empty());
    }

    #[test]
    fn test_contains_str_matches_substrings() {
        let replay = Replay::new();
        record(&replay, Level::ERROR, "123: this is an error message");
        assert!(replay.error().contains_str("this is an error"));
        assert!(!replay.error().contains_str("this is not an error"));
        assert!(replay.error().contains_str(""));
    }

    #[test]
    fn test_contains_match() {
        let replay = Replay::new();
        record(&replay, Level::INFO, "info message 456");
        let buffer = replay.info();
        assert!(buffer.contains_match(&Regex::new(r".*456").unwrap()));
        assert!(!buffer.contains_match(&Regex::new(r"^456").unwrap()));
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(Level::ERROR, "boom");
        assert_eq!(entry.to_string(), "ERROR: \"boom\"");
    }

    #[test]
    fn test_buffer_iteration() {
        let replay = Replay::new();
        record(&replay, Level::INFO, "x");
        record(&replay, Level::INFO, "y");
        let texts: Vec<String> = replay.all().into_iter().map(|entry| entry.text).collect();
        assert_eq!(texts, vec!["x", "y"]);
    }
}
