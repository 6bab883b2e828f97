//! Logging macros with `format!`-style arguments.
//!
//! Each macro takes anything with leveled logging methods: a
//! [`Logger`](crate::Logger), an `Arc<Logger>` or a
//! [`ContextLogger`](crate::ContextLogger). The message is only formatted
//! when the level is enabled.
//!
//! # Examples
//!
//! ```
//! use module_logger::prelude::*;
//! use module_logger::{info, error};
//!
//! let env = LogEnvironment::new();
//! let logger = env.module("server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = logger.with_fields(field_map([("request_id", "r-1")]));
//! error!(request, "Upstream returned {}", 502);
//! ```

/// Log a message at an explicit level.
///
/// ```
/// # use module_logger::prelude::*;
/// # let logger = LogEnvironment::new().module("doc");
/// use module_logger::log;
/// log!(logger, Level::Notice, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use module_logger::prelude::*;
/// # let logger = LogEnvironment::new().module("doc");
/// use module_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "HTTP error {}: {}", 404, "Not Found");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use module_logger::prelude::*;
/// # let logger = LogEnvironment::new().module("doc");
/// use module_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}
