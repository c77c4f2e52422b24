//! Log levels.
//!
//! Levels are totally ordered integers rather than a closed enum so that
//! backends can threshold and branch on them, and so the numeric space stays
//! open for backend-private sub-levels (for example verbosity sub-levels
//! layered above [`Level::INFO`]). Backends must degrade gracefully on levels
//! they do not recognize, treating them as their sink's "info" equivalent.

use std::fmt;

/// Severity of a log message.
///
/// The named constants are spaced out so that custom levels can be slotted
/// between them. Comparison follows the numeric value: `DEBUG < INFO <
/// WARNING < ERROR < FATAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub i32);

impl Level {
    /// Verbose diagnostic messages.
    pub const DEBUG: Level = Level(0);
    /// General informational messages.
    pub const INFO: Level = Level(100);
    /// Warning messages.
    pub const WARNING: Level = Level(200);
    /// Error messages.
    pub const ERROR: Level = Level(300);
    /// Messages that terminate the process after dispatch.
    pub const FATAL: Level = Level(400);

    /// A verbosity sub-level layered above [`Level::INFO`].
    ///
    /// Sub-levels let callers grade informational output without promoting it
    /// to a warning; backends that do not understand them fall back to their
    /// info rendering.
    pub fn verbosity(v: i32) -> Level {
        Level(Level::INFO.0 + v)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Level::DEBUG => write!(f, "DEBUG"),
            Level::INFO => write!(f, "INFO"),
            Level::WARNING => write!(f, "WARNING"),
            Level::ERROR => write!(f, "ERROR"),
            Level::FATAL => write!(f, "FATAL"),
            Level(other) => write!(f, "LEVEL({})", other),
        }
    }
}
