//! Backend adapters for external logging sinks.
//!
//! Each backend is a one-to-one passthrough from the facade's
//! [`Backend`](crate::backend::Backend) contract to an external sink's own
//! API. Backends own and protect their internal resources; the dispatcher
//! only ever sees the two-method capability contract.

pub mod console;
pub mod discard;
pub mod eventlog;
pub mod replay;
#[cfg(unix)]
pub mod syslog;
pub mod tracing;
