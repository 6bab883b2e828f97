//! # Module Logger
//!
//! Structured logging organised by module: every named module carries its
//! own level threshold, formatter, writer, time zone and filter chain,
//! seeded from the defaults of the environment that created it.
//!
//! ## Features
//!
//! - **Modules**: independently configurable named loggers, created on first use
//! - **Structured fields**: custom and global key/value fields on every record
//! - **Filter chain**: environment-wide and module middleware around every write
//! - **Writers**: stream, file, rotating file set, fan-out stack and syslog
//! - **Formatters**: human-readable text (optionally colored) and JSON
//!
//! ## Example
//!
//! ```
//! use module_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let env = LogEnvironment::builder()
//!     .level(Level::Info)
//!     .formatter(Arc::new(JsonFormatter))
//!     .build();
//!
//! let db = env.module("app.db");
//! db.with_fields(field_map([("table", "users")])).info("migrated");
//! ```

pub mod core;
pub mod filters;
pub mod formatters;
pub mod macros;
pub mod writers;

use std::sync::{Arc, OnceLock};

pub mod prelude {
    pub use crate::core::{
        field_map, filter_fn, ContextLogger, EnvironmentBuilder, EnvironmentConfig, Event,
        FailurePolicy, FieldMap, FieldValue, Fields, Filter, Formatter, Level, LogEnvironment,
        Logger, LoggerError, LoggerMetrics, ModuleConfig, Next, Result, SharedFilter, TimeZone,
        Writer,
    };
    pub use crate::filters::{ExitOnLevel, WithField, WithStacktrace};
    pub use crate::formatters::{DefaultFormatter, JsonFormatter, JsonWithTimeFormatter};
    pub use crate::writers::{
        FileWriter, RotatingFileWriter, StackWriter, StreamWriter, SyslogWriter,
    };
}

pub use crate::core::{
    field_map, filter_fn, ContextLogger, EnvironmentBuilder, EnvironmentConfig, Event,
    FailurePolicy, FieldMap, FieldValue, Fields, Filter, Formatter, Level, LogEnvironment, Logger,
    LoggerError, LoggerMetrics, ModuleConfig, Next, OutputFormat, Result, SharedFilter, TimeZone,
    Writer,
};

/// Process-wide environment behind the free functions of this crate
pub fn environment() -> &'static LogEnvironment {
    static ENVIRONMENT: OnceLock<LogEnvironment> = OnceLock::new();
    ENVIRONMENT.get_or_init(LogEnvironment::new)
}

/// Module of the process-wide environment
pub fn module(name: &str) -> Arc<Logger> {
    environment().module(name)
}

pub fn default_module() -> Arc<Logger> {
    environment().default_module()
}

pub fn set_level(level: Level) {
    environment().set_level(level);
}

pub fn set_formatter(formatter: Arc<dyn Formatter>) {
    environment().set_formatter(formatter);
}

pub fn set_writer(writer: Arc<dyn Writer>) {
    environment().set_writer(writer);
}

/// Reopen the writer of the default module
pub fn reopen() -> Result<()> {
    default_module().reopen()
}

/// Close the writer of the default module
pub fn close() -> Result<()> {
    default_module().close()
}

/// Reopen the writers of every module of the process-wide environment
///
/// Every module is attempted; failures are collected into one error.
pub fn reopen_all() -> Result<()> {
    collect_failures(environment().reopen_all())
}

/// Close the writers of every module of the process-wide environment
pub fn close_all() -> Result<()> {
    collect_failures(environment().close_all())
}

fn collect_failures(results: std::collections::HashMap<String, Result<()>>) -> Result<()> {
    let errors: Vec<LoggerError> = results.into_values().filter_map(|r| r.err()).collect();
    LoggerError::from_many(errors).map_or(Ok(()), Err)
}

#[track_caller]
pub fn emergency(message: impl Into<String>) {
    default_module().output(1, Level::Emergency, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn alert(message: impl Into<String>) {
    default_module().output(1, Level::Alert, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn critical(message: impl Into<String>) {
    default_module().output(1, Level::Critical, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    default_module().output(1, Level::Error, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn warning(message: impl Into<String>) {
    default_module().output(1, Level::Warning, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn notice(message: impl Into<String>) {
    default_module().output(1, Level::Notice, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    default_module().output(1, Level::Info, FieldMap::new(), vec![message.into()]);
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    default_module().output(1, Level::Debug, FieldMap::new(), vec![message.into()]);
}

/// Bind fields on the default module of the process-wide environment
pub fn with_fields(fields: FieldMap) -> ContextLogger {
    default_module().with_fields(fields)
}
