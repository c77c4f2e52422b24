//! Formatted logging macros.
//!
//! These are the formatted variants of the leveled calls, built on
//! `format_args!` so the rendered text is byte-identical to the equivalent
//! `format!` invocation. Each macro has two forms: with an explicit
//! dispatcher expression first, or format-string-first to target the
//! process-wide default dispatcher.
//!
//! ```
//! use fanlog::{infof, Dispatcher};
//!
//! let d = Dispatcher::new();
//! infof!(d, "{} items", 3);     // explicit dispatcher
//! infof!("{} items", 3);        // global default dispatcher
//! ```

/// Log a formatted message at DEBUG level.
#[macro_export]
macro_rules! debugf {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global().debug(::core::format_args!($fmt $($arg)*))
    };
    ($dispatcher:expr, $fmt:literal $($arg:tt)*) => {
        $dispatcher.debug(::core::format_args!($fmt $($arg)*))
    };
}

/// Log a formatted message at INFO level.
#[macro_export]
macro_rules! infof {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global().info(::core::format_args!($fmt $($arg)*))
    };
    ($dispatcher:expr, $fmt:literal $($arg:tt)*) => {
        $dispatcher.info(::core::format_args!($fmt $($arg)*))
    };
}

/// Log a formatted message at WARNING level.
#[macro_export]
macro_rules! warningf {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global().warning(::core::format_args!($fmt $($arg)*))
    };
    ($dispatcher:expr, $fmt:literal $($arg:tt)*) => {
        $dispatcher.warning(::core::format_args!($fmt $($arg)*))
    };
}

/// Log a formatted message at ERROR level.
#[macro_export]
macro_rules! errorf {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global().error(::core::format_args!($fmt $($arg)*))
    };
    ($dispatcher:expr, $fmt:literal $($arg:tt)*) => {
        $dispatcher.error(::core::format_args!($fmt $($arg)*))
    };
}

/// Log a formatted message at FATAL level, then terminate the process.
#[macro_export]
macro_rules! fatalf {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global().fatal(::core::format_args!($fmt $($arg)*))
    };
    ($dispatcher:expr, $fmt:literal $($arg:tt)*) => {
        $dispatcher.fatal(::core::format_args!($fmt $($arg)*))
    };
}
