//! The backend capability contract.
//!
//! A backend is anything that can build a per-call [`Message`] for a level
//! and rendered text, and release its resources on close. The dispatcher
//! holds backends only through this trait and knows nothing about their
//! internal state.
//!
//! Messages follow a two-phase protocol: [`Message::compose`] consumes
//! directives from the call's attribute store into backend-private fields,
//! then [`Message::write`] performs the actual sink I/O. A message is written
//! at most once, and only after a successful compose. The message borrows its
//! backend for the duration of the call, so neither the message nor the
//! attribute store can outlive the dispatch that produced them.

use crate::attrib::AttribStore;
use crate::error::BackendError;
use crate::level::Level;

/// A logging sink adapted to the facade.
///
/// Implementations must be `Send + Sync`: the same backend instance is
/// reached from every thread logging through the dispatcher, and must guard
/// its own internal resources.
pub trait Backend: Send + Sync {
    /// Build a message for one log call. Must not perform I/O.
    fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a>;

    /// Release the backend's resources.
    ///
    /// Idempotence is the backend's own concern; the dispatcher calls this
    /// once per registration when it is closed.
    fn close(&self) -> Result<(), BackendError>;
}

/// One backend's rendering of one log call.
pub trait Message {
    /// Consume directives from the attribute store into private fields.
    ///
    /// # Errors
    ///
    /// A descriptive error when a directive the backend requires is absent,
    /// or a present directive is malformed. The failure aborts only this
    /// backend's contribution to the fan-out.
    fn compose(&mut self, attribs: &AttribStore) -> Result<(), BackendError>;

    /// Perform the sink I/O, mapping the level to the sink's own severity
    /// vocabulary. Unmapped levels fall back to the sink's info equivalent.
    fn write(&mut self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_trait_is_object_safe() {
        fn assert_object_safe(_: &dyn Backend) {}
        let _ = assert_object_safe;
    }

    #[test]
    fn test_backend_requires_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Backend>();
    }
}
