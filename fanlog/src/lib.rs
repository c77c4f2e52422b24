//! fanlog - a leveled logging facade with pluggable backend sinks.
//!
//! A single log call fans out to every registered backend: console writers,
//! the local syslog socket, the Windows Event Log, the `tracing` ecosystem,
//! an in-memory replay recorder for tests, or a discard sink. Backends
//! privately negotiate extra metadata about each message through a
//! type-erased per-call attribute store, so the facade never needs to know
//! backend-specific vocabulary.
//!
//! # Quick start
//!
//! ```
//! use fanlog::backends::console::Console;
//! use fanlog::Dispatcher;
//! use std::sync::Arc;
//!
//! let d = Dispatcher::new();
//! d.add(Arc::new(Console::stderr()));
//! d.info("service starting");
//! fanlog::errorf!(d, "{} retries exhausted", 3);
//! ```
//!
//! # The global dispatcher
//!
//! A process-wide default dispatcher is available through free functions
//! mirroring the instance API. It starts with an empty registry; configure it
//! once during startup, then log from anywhere:
//!
//! ```
//! use fanlog::backends::replay::Replay;
//! use std::sync::Arc;
//!
//! let recorder = Arc::new(Replay::new());
//! fanlog::add(recorder.clone());
//! fanlog::info("ambient logging");
//! assert!(recorder.info().contains_str("ambient logging"));
//! # fanlog::close().unwrap();
//! ```
//!
//! # Directives
//!
//! Attribute-augmented calls attach backend-specific directives to a single
//! message through a fluent builder, finalized with an explicit `go`:
//!
//! ```
//! use fanlog::backends::eventlog::event_id;
//! use fanlog::Dispatcher;
//!
//! let d = Dispatcher::new();
//! d.error_with("disk failure").with(event_id(214)).go();
//! ```
//!
//! # Fatal calls
//!
//! `fatal` terminates the process after every backend has been offered the
//! message. The termination effect is injectable per dispatcher
//! ([`Dispatcher::set_exit_handler`]) so test suites can observe fatal
//! dispatch without exiting.

pub mod attrib;
pub mod backend;
pub mod backends;
pub mod dispatcher;
pub mod error;
pub mod level;
mod macros;

pub use attrib::{depth, verbosity, Attrib, AttribStore};
pub use backend::{Backend, Message};
pub use dispatcher::{Dispatcher, LogCall};
pub use error::{BackendError, CloseError};
pub use level::Level;

use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// The process-wide default dispatcher, lazily initialized with an empty
/// registry.
pub fn global() -> &'static Dispatcher {
    GLOBAL.get_or_init(Dispatcher::new)
}

/// Register a backend with the global dispatcher.
pub fn add(backend: Arc<dyn Backend>) {
    global().add(backend);
}

/// Close every backend registered with the global dispatcher.
///
/// Subsequent logging through the global dispatcher is a safe no-op until a
/// backend is added again.
pub fn close() -> Result<(), CloseError> {
    global().close()
}

/// Set the global dispatcher's verbosity threshold.
pub fn set_verbosity(v: i32) {
    global().set_verbosity(v);
}

/// Log at [`Level::DEBUG`] through the global dispatcher.
pub fn debug(text: impl fmt::Display) {
    global().debug(text);
}

/// Log at [`Level::INFO`] through the global dispatcher.
pub fn info(text: impl fmt::Display) {
    global().info(text);
}

/// Log at [`Level::WARNING`] through the global dispatcher.
pub fn warning(text: impl fmt::Display) {
    global().warning(text);
}

/// Log at [`Level::ERROR`] through the global dispatcher.
pub fn error(text: impl fmt::Display) {
    global().error(text);
}

/// Log at [`Level::FATAL`] through the global dispatcher, then terminate the
/// process.
pub fn fatal(text: impl fmt::Display) {
    global().fatal(text);
}

/// Log at an arbitrary level through the global dispatcher.
pub fn log(level: Level, text: impl fmt::Display) {
    global().log(level, text);
}

/// Start an attribute-augmented call through the global dispatcher.
pub fn log_with(level: Level, text: impl fmt::Display) -> LogCall<'static> {
    global().log_with(level, text)
}

/// Start an attribute-augmented [`Level::DEBUG`] call through the global
/// dispatcher.
pub fn debug_with(text: impl fmt::Display) -> LogCall<'static> {
    global().debug_with(text)
}

/// Start an attribute-augmented [`Level::INFO`] call through the global
/// dispatcher.
pub fn info_with(text: impl fmt::Display) -> LogCall<'static> {
    global().info_with(text)
}

/// Start an attribute-augmented [`Level::WARNING`] call through the global
/// dispatcher.
pub fn warning_with(text: impl fmt::Display) -> LogCall<'static> {
    global().warning_with(text)
}

/// Start an attribute-augmented [`Level::ERROR`] call through the global
/// dispatcher.
pub fn error_with(text: impl fmt::Display) -> LogCall<'static> {
    global().error_with(text)
}

/// Start an attribute-augmented [`Level::FATAL`] call through the global
/// dispatcher.
pub fn fatal_with(text: impl fmt::Display) -> LogCall<'static> {
    global().fatal_with(text)
}
