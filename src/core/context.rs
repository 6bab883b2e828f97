//! Logger wrapper carrying bound fields

use super::{
    fields::{FieldMap, FieldValue},
    level::Level,
    logger::{Logger, DATA_FIELD},
};
use serde::Serialize;
use std::sync::Arc;

/// A [`Logger`] plus a fixed set of custom fields added to every record
///
/// Chaining never changes an existing wrapper: [`with_fields`](Self::with_fields)
/// returns a new one sharing the same logger.
///
/// ```
/// use module_logger::prelude::*;
///
/// let env = LogEnvironment::new();
/// let request = env
///     .module("app.http")
///     .with_fields(field_map([("request_id", "r-17")]));
/// let user = request.with_fields(field_map([("user", "alice")]));
///
/// assert_eq!(request.fields().len(), 1);
/// assert_eq!(user.fields().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ContextLogger {
    logger: Arc<Logger>,
    fields: Arc<FieldMap>,
}

impl ContextLogger {
    pub fn new(logger: Arc<Logger>, fields: FieldMap) -> Self {
        Self {
            logger,
            fields: Arc::new(fields),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// New wrapper with `fields` merged over the bound ones
    pub fn with_fields(&self, fields: FieldMap) -> Self {
        let mut merged = (*self.fields).clone();
        merged.extend(fields);
        Self {
            logger: Arc::clone(&self.logger),
            fields: Arc::new(merged),
        }
    }

    /// New wrapper with `data` bound under the `@` key
    pub fn with<T: Serialize + ?Sized>(&self, data: &T) -> Self {
        let mut fields = FieldMap::new();
        fields.insert(DATA_FIELD.to_string(), FieldValue::serialized(data));
        self.with_fields(fields)
    }

    #[track_caller]
    fn emit(&self, level: Level, message: String) {
        self.logger
            .output(2, level, (*self.fields).clone(), vec![message]);
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.logger.is_enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.emit(level, message.into());
    }

    #[track_caller]
    pub fn emergency(&self, message: impl Into<String>) {
        self.emit(Level::Emergency, message.into());
    }

    #[track_caller]
    pub fn alert(&self, message: impl Into<String>) {
        self.emit(Level::Alert, message.into());
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.emit(Level::Critical, message.into());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message.into());
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.emit(Level::Warning, message.into());
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<String>) {
        self.emit(Level::Notice, message.into());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(Level::Info, message.into());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Level::Debug, message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::ModuleConfig, event::Event, field_map};
    use crate::writers::StackWriter;

    fn logger() -> Arc<Logger> {
        let config = ModuleConfig {
            writer: Arc::new(StackWriter::new()),
            ..ModuleConfig::default()
        };
        Arc::new(Logger::detached("ctx", config))
    }

    #[test]
    fn test_with_fields_does_not_mutate_original() {
        let base = logger().with_fields(field_map([("a", 1)]));
        let child = base.with_fields(field_map([("a", 2), ("b", 3)]));

        assert_eq!(base.fields()["a"], FieldValue::Int(1));
        assert!(!base.fields().contains_key("b"));
        assert_eq!(child.fields()["a"], FieldValue::Int(2));
        assert_eq!(child.fields()["b"], FieldValue::Int(3));
        assert!(Arc::ptr_eq(base.logger(), child.logger()));
    }

    #[test]
    fn test_bound_fields_reach_the_formatter() {
        let logger = logger();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        logger.set_formatter(Arc::new(move |event: &Event| {
            sink.lock().push(event.serialize());
            String::new()
        }));

        logger.with_fields(field_map([("user", "bob")])).info("hello");

        assert_eq!(*seen.lock(), vec![r#"{"user":"bob"}"#.to_string()]);
    }

    #[test]
    fn test_with_binds_data() {
        let ctx = logger().with_fields(FieldMap::new()).with(&("x", 1));
        assert_eq!(ctx.fields()[DATA_FIELD].to_string(), r#"["x",1]"#);
    }
}
