//! Ready-made filters
//!
//! - [`WithField`]: tag every record with a fixed field
//! - [`ExitOnLevel`]: end the process after a record of one level is written
//! - [`WithStacktrace`]: attach a backtrace to records of selected levels

use crate::core::{Event, FieldValue, Filter, Level, Next, Result};
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

/// Which field namespace a filter writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Namespace {
    Custom,
    #[default]
    Global,
}

/// Adds one field, then continues the chain
#[derive(Debug, Clone)]
pub struct WithField {
    key: String,
    value: FieldValue,
    namespace: Namespace,
}

impl WithField {
    pub fn global(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            namespace: Namespace::Global,
        }
    }

    pub fn custom(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            namespace: Namespace::Custom,
        }
    }
}

impl Filter for WithField {
    fn apply(&self, mut event: Event, next: Next<'_>) -> Result<()> {
        match self.namespace {
            Namespace::Global => event.fields.insert_global(self.key.clone(), self.value.clone()),
            Namespace::Custom => event.fields.insert_custom(self.key.clone(), self.value.clone()),
        }
        next.run(event)
    }
}

/// Action run by [`ExitOnLevel`] with the configured exit code
pub type ExitAction = Arc<dyn Fn(i32) + Send + Sync>;

/// Lets the record through, then exits if its level matches
///
/// The record is written first, so the reason for the exit is in the log.
///
/// ```no_run
/// use module_logger::filters::ExitOnLevel;
/// use module_logger::LogEnvironment;
/// use std::sync::Arc;
///
/// let env = LogEnvironment::new();
/// env.add_global_filter(Arc::new(ExitOnLevel::emergency(1)));
/// env.module("app").emergency("cannot continue");
/// ```
pub struct ExitOnLevel {
    level: Level,
    code: i32,
    action: ExitAction,
}

impl ExitOnLevel {
    pub fn new(level: Level, code: i32) -> Self {
        Self {
            level,
            code,
            action: Arc::new(|code: i32| {
                std::process::exit(code);
            }),
        }
    }

    /// Exit with `code` after every emergency record
    pub fn emergency(code: i32) -> Self {
        Self::new(Level::Emergency, code)
    }

    /// Replace `std::process::exit` with another action
    #[must_use]
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.action = Arc::new(action);
        self
    }
}

impl Filter for ExitOnLevel {
    fn apply(&self, event: Event, next: Next<'_>) -> Result<()> {
        let matches = event.level == self.level;
        let result = next.run(event);
        if matches {
            (self.action)(self.code);
        }
        result
    }
}

impl fmt::Debug for ExitOnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitOnLevel")
            .field("level", &self.level)
            .field("code", &self.code)
            .finish()
    }
}

/// Global field holding the captured backtrace
pub const STACKTRACE_FIELD: &str = "stacktrace";

/// Adds a `stacktrace` global field to records of the given levels
#[derive(Debug, Clone)]
pub struct WithStacktrace {
    levels: Vec<Level>,
}

impl WithStacktrace {
    pub fn new(levels: &[Level]) -> Self {
        Self {
            levels: levels.to_vec(),
        }
    }

    /// Error and everything more severe
    pub fn errors() -> Self {
        Self::new(&[Level::Error, Level::Critical, Level::Alert, Level::Emergency])
    }
}

impl Filter for WithStacktrace {
    fn apply(&self, mut event: Event, next: Next<'_>) -> Result<()> {
        if event.level.is_in(&self.levels) {
            let trace = Backtrace::force_capture().to_string();
            event.fields.insert_global(STACKTRACE_FIELD, trace);
        }
        next.run(event)
    }
}
