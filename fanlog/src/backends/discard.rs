//! Backend that discards every message.
//!
//! Satisfies the need for at least one registered backend in situations
//! where any actual output is unwanted, and silences dispatchers in tests
//! and benchmarks.

use crate::attrib::AttribStore;
use crate::backend::{Backend, Message};
use crate::error::BackendError;
use crate::level::Level;

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Discard {
    /// Create a discard backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for Discard {
    fn message<'a>(&'a self, _level: Level, _text: &str) -> Box<dyn Message + 'a> {
        Box::new(DiscardMessage)
    }

    fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

struct DiscardMessage;

impl Message for DiscardMessage {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}
