//! Structured pass-through to the `tracing` ecosystem.
//!
//! Facade levels map onto `tracing` events (`DEBUG` → `debug!`, `INFO` →
//! `info!`, `WARNING` → `warn!`, `ERROR` and `FATAL` → `error!`; levels the
//! sink has no word for degrade toward `info!`). Which subscriber renders
//! the events, and how, is entirely the host application's business.
//!
//! The backend also supports verbosity-graded logging through the
//! [`trace_verbosity`] directive. A call carrying it is emitted as a verbose
//! debug event with a `verbosity` field, overriding the facade level:
//!
//! ```
//! use fanlog::backends::tracing::{trace_verbosity, Tracing};
//! use fanlog::Dispatcher;
//! use std::sync::Arc;
//!
//! let d = Dispatcher::new();
//! d.add(Arc::new(Tracing::new()));
//! d.info_with("cache warm-up finished").with(trace_verbosity(3)).go();
//! ```
//!
//! This directive only affects the tracing backend; the facade-wide
//! [`verbosity`](crate::attrib::verbosity) directive gates dispatch to every
//! backend instead.

use crate::attrib::{self, Attrib, AttribStore};
use crate::backend::{Backend, Message};
use crate::error::BackendError;
use crate::level::Level;

/// Store key for the backend-private verbosity override.
pub const TRACE_VERBOSITY: &str = "TracingV";

/// Emit this call as a verbose debug event at verbosity `v`, overriding the
/// facade level for the tracing backend only.
pub fn trace_verbosity(v: i32) -> Attrib {
    Box::new(move |store| store.store(TRACE_VERBOSITY, v))
}

/// Backend forwarding messages to `tracing` events.
#[derive(Debug, Clone, Copy)]
pub struct Tracing {
    debug_verbosity: i32,
}

impl Tracing {
    /// Create a tracing backend. Plain DEBUG calls carry verbosity 1.
    pub fn new() -> Self {
        Self { debug_verbosity: 1 }
    }

    /// Override the verbosity attached to plain DEBUG calls.
    pub fn with_debug_verbosity(mut self, v: i32) -> Self {
        self.debug_verbosity = v;
        self
    }
}

impl Default for Tracing {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Tracing {
    fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a> {
        Box::new(TracingMessage {
            parent: self,
            level,
            text: text.to_string(),
            verbosity: None,
        })
    }

    fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

struct TracingMessage<'a> {
    parent: &'a Tracing,
    level: Level,
    text: String,
    verbosity: Option<i32>,
}

impl Message for TracingMessage<'_> {
    fn compose(&mut self, attribs: &AttribStore) -> Result<(), BackendError> {
        attribs.get::<usize>(attrib::DEPTH)?;
        self.verbosity = attribs.get_opt::<i32>(TRACE_VERBOSITY)?.copied();
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        if let Some(v) = self.verbosity {
            ::tracing::debug!(verbosity = v, "{}", self.text);
            return Ok(());
        }
        match self.level {
            Level::DEBUG => {
                ::tracing::debug!(verbosity = self.parent.debug_verbosity, "{}", self.text)
            }
            Level::INFO => ::tracing::info!("{}", self.text),
            Level::WARNING => ::tracing::warn!("{}", self.text),
            Level::ERROR => ::tracing::error!("{}", self.text),
            Level::FATAL => ::tracing::error!("{}", self.text),
            _ => ::tracing::info!("{}", self.text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> AttribStore {
        let mut store = AttribStore::new();
        store.store(attrib::DEPTH, 0usize);
        store
    }

    #[test]
    fn test_trace_verbosity_directive_stores_key() {
        let mut store = AttribStore::new();
        trace_verbosity(4)(&mut store);
        assert_eq!(*store.get::<i32>(TRACE_VERBOSITY).unwrap(), 4);
    }

    #[test]
    fn test_compose_without_override() {
        let backend = Tracing::new();
        let mut message = backend.message(Level::INFO, "plain");
        message.compose(&seeded_store()).unwrap();
        assert!(message.write().is_ok());
    }

    #[test]
    fn test_compose_rejects_malformed_override() {
        let backend = Tracing::new();
        let mut message = backend.message(Level::INFO, "bad");
        let mut store = seeded_store();
        store.store(TRACE_VERBOSITY, "very");
        let err = message.compose(&store).unwrap_err();
        assert!(err.to_string().contains("'TracingV' is not a"));
    }

    #[test]
    fn test_write_without_subscriber_is_harmless() {
        // With no subscriber installed every event is a no-op; the backend
        // must still satisfy the contract.
        let backend = Tracing::new().with_debug_verbosity(2);
        for level in [Level::DEBUG, Level::WARNING, Level::FATAL, Level(777)] {
            let mut message = backend.message(level, "quiet");
            message.compose(&seeded_store()).unwrap();
            assert!(message.write().is_ok());
        }
    }
}
