//! Error types for the facade and its backends.
//!
//! Per-call composition and write failures are isolated per backend and never
//! propagated to the logging caller; construction and close failures are
//! returned to the caller that owns the backend lifecycle.

use std::fmt;
use std::io;
use thiserror::Error;

/// Errors produced by a backend while composing, writing, or closing.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A directive the backend requires was not present in the attribute
    /// store.
    #[error("required attribute '{key}' is missing")]
    MissingAttrib {
        /// Attribute store key that was looked up.
        key: String,
    },

    /// A directive was present but carried a value of the wrong type.
    #[error("attribute '{key}' is not a {expected}")]
    AttribType {
        /// Attribute store key that was looked up.
        key: String,
        /// Type the backend expected to find.
        expected: &'static str,
    },

    /// I/O failure while talking to the underlying sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend was used after its resources were released.
    #[error("backend is closed")]
    Closed,

    /// Sink-specific failure.
    #[error("{0}")]
    Sink(String),
}

/// Aggregate of backend close failures.
///
/// `Dispatcher::close` gives every registered backend a chance to close and
/// collects the failures instead of short-circuiting on the first one.
#[derive(Debug)]
pub struct CloseError {
    failures: Vec<BackendError>,
}

impl CloseError {
    pub(crate) fn new(failures: Vec<BackendError>) -> Self {
        Self { failures }
    }

    /// The individual backend failures, in registration order.
    pub fn failures(&self) -> &[BackendError] {
        &self.failures
    }
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} backend(s) failed to close: ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for CloseError {}
