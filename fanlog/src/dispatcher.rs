//! The dispatcher: backend registry and fan-out engine.
//!
//! A [`Dispatcher`] owns the live set of registered backends and exposes the
//! leveled logging API. Each call builds a fresh attribute store from the
//! call-site directives, then asks every registered backend in registration
//! order for a message, composes it against the store, and writes it. One
//! backend's failure never stops fan-out to the remaining backends.
//!
//! # Concurrency
//!
//! Any number of threads may log, [`add`](Dispatcher::add), or
//! [`close`](Dispatcher::close) concurrently. The registry is the only
//! resource shared across calls and is mutex-protected; a logging call takes
//! a snapshot of the registry and releases the lock before touching any
//! backend, so a concurrent `add` may or may not be observed by an in-flight
//! call but can never corrupt the list.

use crate::attrib::{self, Attrib, AttribStore};
use crate::backend::Backend;
use crate::error::CloseError;
use crate::level::Level;
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Registry of backends plus the fan-out engine.
///
/// A new dispatcher starts with an empty registry; logging through it is a
/// safe no-op until a backend is added. Closing drains the registry; adding
/// afterwards implicitly reopens it.
pub struct Dispatcher {
    backends: Mutex<Vec<Arc<dyn Backend>>>,
    verbosity: AtomicI32,
    exit: RwLock<ExitHandler>,
}

impl Dispatcher {
    /// Create a dispatcher with no registered backends.
    pub fn new() -> Self {
        let exit: ExitHandler = Arc::new(|code| std::process::exit(code));
        Self {
            backends: Mutex::new(Vec::new()),
            verbosity: AtomicI32::new(0),
            exit: RwLock::new(exit),
        }
    }

    /// Register a backend.
    ///
    /// Safe to call concurrently with logging calls; the new backend
    /// participates in subsequent calls, not calls already in flight.
    pub fn add(&self, backend: Arc<dyn Backend>) {
        self.backends.lock().unwrap().push(backend);
    }

    /// Number of currently registered backends.
    pub fn backend_count(&self) -> usize {
        self.backends.lock().unwrap().len()
    }

    /// Set the facade-wide verbosity threshold (default 0).
    ///
    /// Calls carrying a [`verbosity`](crate::attrib::verbosity) directive
    /// above this threshold are dropped before fan-out.
    pub fn set_verbosity(&self, v: i32) {
        self.verbosity.store(v, Ordering::Relaxed);
    }

    /// Replace the effect invoked after a FATAL fan-out completes.
    ///
    /// Defaults to `std::process::exit`. Tests replace it to observe FATAL
    /// dispatch without terminating the test process.
    pub fn set_exit_handler(&self, handler: impl Fn(i32) + Send + Sync + 'static) {
        *self.exit.write().unwrap() = Arc::new(handler);
    }

    /// Close every registered backend and clear the registry.
    ///
    /// Every backend gets a chance to close; individual failures are
    /// collected into the returned [`CloseError`] rather than
    /// short-circuiting. Logging after close is a safe no-op, and `add`
    /// implicitly reopens the dispatcher.
    pub fn close(&self) -> Result<(), CloseError> {
        let drained = std::mem::take(&mut *self.backends.lock().unwrap());
        let mut failures = Vec::new();
        for backend in drained {
            if let Err(err) = backend.close() {
                failures.push(err);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CloseError::new(failures))
        }
    }

    /// Log at [`Level::DEBUG`].
    pub fn debug(&self, text: impl fmt::Display) {
        self.dispatch(Level::DEBUG, &text.to_string(), Vec::new());
    }

    /// Log at [`Level::INFO`].
    pub fn info(&self, text: impl fmt::Display) {
        self.dispatch(Level::INFO, &text.to_string(), Vec::new());
    }

    /// Log at [`Level::WARNING`].
    pub fn warning(&self, text: impl fmt::Display) {
        self.dispatch(Level::WARNING, &text.to_string(), Vec::new());
    }

    /// Log at [`Level::ERROR`].
    pub fn error(&self, text: impl fmt::Display) {
        self.dispatch(Level::ERROR, &text.to_string(), Vec::new());
    }

    /// Log at [`Level::FATAL`], then terminate the process.
    ///
    /// Termination happens only after every backend has been offered the
    /// message, preserving a best-effort "last words" guarantee. The effect
    /// itself is the configured exit handler.
    pub fn fatal(&self, text: impl fmt::Display) {
        self.dispatch(Level::FATAL, &text.to_string(), Vec::new());
    }

    /// Log at an arbitrary level.
    pub fn log(&self, level: Level, text: impl fmt::Display) {
        self.dispatch(level, &text.to_string(), Vec::new());
    }

    /// Start an attribute-augmented call at an arbitrary level.
    ///
    /// The returned builder accumulates directives and dispatches on
    /// [`LogCall::go`].
    pub fn log_with(&self, level: Level, text: impl fmt::Display) -> LogCall<'_> {
        LogCall {
            dispatcher: self,
            level,
            text: text.to_string(),
            attribs: Vec::new(),
        }
    }

    /// Start an attribute-augmented [`Level::DEBUG`] call.
    pub fn debug_with(&self, text: impl fmt::Display) -> LogCall<'_> {
        self.log_with(Level::DEBUG, text)
    }

    /// Start an attribute-augmented [`Level::INFO`] call.
    pub fn info_with(&self, text: impl fmt::Display) -> LogCall<'_> {
        self.log_with(Level::INFO, text)
    }

    /// Start an attribute-augmented [`Level::WARNING`] call.
    pub fn warning_with(&self, text: impl fmt::Display) -> LogCall<'_> {
        self.log_with(Level::WARNING, text)
    }

    /// Start an attribute-augmented [`Level::ERROR`] call.
    pub fn error_with(&self, text: impl fmt::Display) -> LogCall<'_> {
        self.log_with(Level::ERROR, text)
    }

    /// Start an attribute-augmented [`Level::FATAL`] call.
    pub fn fatal_with(&self, text: impl fmt::Display) -> LogCall<'_> {
        self.log_with(Level::FATAL, text)
    }

    /// The single internal dispatch routine all call variants funnel into.
    fn dispatch(&self, level: Level, text: &str, attribs: Vec<Attrib>) {
        let mut store = AttribStore::new();
        store.store(attrib::DEPTH, 0usize);
        for apply in attribs {
            apply(&mut store);
        }

        if let Some(v) = store.load_as::<i32>(attrib::VERBOSITY) {
            if *v > self.verbosity.load(Ordering::Relaxed) {
                return;
            }
        }

        // Snapshot under the lock, fan out without it: backend I/O must not
        // block concurrent add/close.
        let snapshot: Vec<Arc<dyn Backend>> = self.backends.lock().unwrap().clone();
        for (index, backend) in snapshot.iter().enumerate() {
            let mut message = backend.message(level, text);
            if let Err(err) = message.compose(&store) {
                // Failures are isolated: report and move on to the next
                // backend. The facade cannot log through itself.
                eprintln!("fanlog: backend {} failed to compose: {}", index, err);
                continue;
            }
            if let Err(err) = message.write() {
                eprintln!("fanlog: backend {} failed to write: {}", index, err);
            }
        }

        if level == Level::FATAL {
            let exit = self.exit.read().unwrap().clone();
            (exit.as_ref())(1);
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("backends", &self.backend_count())
            .field("verbosity", &self.verbosity.load(Ordering::Relaxed))
            .finish()
    }
}

/// Builder for one attribute-augmented log call.
///
/// Accumulates directives in the order given and dispatches on [`go`]
/// (nothing is sent until then). Later directives overwrite earlier ones
/// targeting the same store key.
///
/// [`go`]: LogCall::go
#[must_use = "a log call does nothing until .go() is invoked"]
pub struct LogCall<'a> {
    dispatcher: &'a Dispatcher,
    level: Level,
    text: String,
    attribs: Vec<Attrib>,
}

impl LogCall<'_> {
    /// Attach a directive to this call.
    pub fn with(mut self, attrib: Attrib) -> Self {
        self.attribs.push(attrib);
        self
    }

    /// Dispatch the call to every registered backend.
    pub fn go(self) {
        self.dispatcher.dispatch(self.level, &self.text, self.attribs);
    }
}
