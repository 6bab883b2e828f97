//! Module logger and the emission pipeline

use super::{
    callsite::capture_call_site,
    config::{FailurePolicy, GlobalFieldsFn, ModuleConfig},
    context::ContextLogger,
    environment::Registry,
    error::{LoggerError, Result},
    event::Event,
    fields::{FieldMap, FieldValue, Fields},
    filter::{FilterChain, SharedFilter},
    formatter::Formatter,
    level::Level,
    metrics::LoggerMetrics,
    timestamp::TimeZone,
    writer::Writer,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Weak};

/// Key under which [`Logger::with`] binds its data
pub const DATA_FIELD: &str = "@";

struct LoggerState {
    config: ModuleConfig,
    filters: Vec<SharedFilter>,
}

/// Named log source with its own configuration
///
/// Loggers are created by a [`LogEnvironment`](crate::LogEnvironment) and
/// shared as `Arc<Logger>`. Their configuration starts as a copy of the
/// environment defaults and can then be changed independently.
///
/// # Example
///
/// ```
/// use module_logger::prelude::*;
///
/// let env = LogEnvironment::new();
/// let http = env.module("app.http");
/// http.set_level(Level::Warning);
///
/// assert!(!http.info_enabled());
/// assert!(http.error_enabled());
/// ```
pub struct Logger {
    name: String,
    state: RwLock<LoggerState>,
    registry: Weak<Registry>,
    metrics: LoggerMetrics,
}

impl Logger {
    pub(crate) fn new(
        name: impl Into<String>,
        config: ModuleConfig,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(LoggerState {
                config,
                filters: Vec::new(),
            }),
            registry,
            metrics: LoggerMetrics::new(),
        }
    }

    /// Standalone logger outside any environment
    ///
    /// It never sees environment-wide filters.
    pub fn detached(name: impl Into<String>, config: ModuleConfig) -> Self {
        Self::new(name, config, Weak::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the current configuration
    pub fn config(&self) -> ModuleConfig {
        self.state.read().config.clone()
    }

    pub fn level(&self) -> Level {
        self.state.read().config.level
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Emit a record.
    ///
    /// `call_depth` is the number of library frames between the user's call
    /// and this function; it is skipped before the stack is searched for the
    /// caller.
    #[track_caller]
    pub fn output(
        &self,
        call_depth: usize,
        level: Level,
        user_fields: FieldMap,
        messages: Vec<String>,
    ) {
        let (config, local_filters) = {
            let state = self.state.read();
            (state.config.clone(), state.filters.clone())
        };

        if level < config.level {
            self.metrics.record_suppressed();
            return;
        }

        let mut fields = Fields::from_custom(user_fields);
        let mut module = self.name.clone();
        // The unnamed module is always named after its caller
        let dynamic_name = config.dynamic_module_name || self.name.is_empty();

        if config.file_line || dynamic_name {
            let site = capture_call_site(Location::caller(), call_depth);
            if dynamic_name {
                module = site.module_name();
            }
            if config.file_line {
                fields.insert_global("file", site.file);
                fields.insert_global("line", site.line);
                fields.insert_global("package", site.package);
                if let Some(function) = site.function {
                    fields.insert_global("func", function);
                }
            }
        }

        if let Some(inject) = &config.global_fields {
            inject(&mut fields);
        }

        let event = Event::new(config.timezone.now(), module, level, fields, messages);
        let chain = FilterChain::compose(&self.global_filters(), &local_filters);

        let result = chain.run(event, |event| {
            let text = config.formatter.format(&event);
            config.writer.write(event.level, &event.module, &text)?;
            self.metrics.record_written();
            Ok(())
        });

        if let Err(e) = result {
            self.handle_failure(config.failure_policy, e);
        }
    }

    #[track_caller]
    fn handle_failure(&self, policy: FailurePolicy, error: LoggerError) {
        self.metrics.record_failure();

        match policy {
            FailurePolicy::Abort => {
                panic!(
                    "[LOGGER ERROR] module {:?} failed to write a record: {}",
                    self.name, error
                )
            }
            FailurePolicy::ReportAndContinue => {
                eprintln!(
                    "[LOGGER ERROR] module {:?} failed to write a record: {}",
                    self.name, error
                );
            }
            FailurePolicy::Silent => {}
        }
    }

    fn global_filters(&self) -> Vec<SharedFilter> {
        self.registry
            .upgrade()
            .map(|registry| registry.global_filters())
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.output(1, level, FieldMap::new(), vec![message.into()]);
    }

    /// Log several message parts, concatenated without separator
    #[track_caller]
    pub fn log_parts<I, S>(&self, level: Level, parts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output(1, level, FieldMap::new(), parts.into_iter().map(Into::into).collect());
    }

    #[track_caller]
    pub fn emergency(&self, message: impl Into<String>) {
        self.output(1, Level::Emergency, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn alert(&self, message: impl Into<String>) {
        self.output(1, Level::Alert, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.output(1, Level::Critical, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.output(1, Level::Error, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.output(1, Level::Warning, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<String>) {
        self.output(1, Level::Notice, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.output(1, Level::Info, FieldMap::new(), vec![message.into()]);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.output(1, Level::Debug, FieldMap::new(), vec![message.into()]);
    }

    pub fn emergency_enabled(&self) -> bool {
        self.is_enabled(Level::Emergency)
    }

    pub fn alert_enabled(&self) -> bool {
        self.is_enabled(Level::Alert)
    }

    pub fn critical_enabled(&self) -> bool {
        self.is_enabled(Level::Critical)
    }

    pub fn error_enabled(&self) -> bool {
        self.is_enabled(Level::Error)
    }

    pub fn warning_enabled(&self) -> bool {
        self.is_enabled(Level::Warning)
    }

    pub fn notice_enabled(&self) -> bool {
        self.is_enabled(Level::Notice)
    }

    pub fn info_enabled(&self) -> bool {
        self.is_enabled(Level::Info)
    }

    pub fn debug_enabled(&self) -> bool {
        self.is_enabled(Level::Debug)
    }

    /// Bind fields to every record logged through the returned wrapper
    pub fn with_fields(self: &Arc<Self>, fields: FieldMap) -> ContextLogger {
        ContextLogger::new(Arc::clone(self), fields)
    }

    /// Bind arbitrary serializable data under the `@` key
    pub fn with<T: Serialize + ?Sized>(self: &Arc<Self>, data: &T) -> ContextLogger {
        let mut fields = FieldMap::new();
        fields.insert(DATA_FIELD.to_string(), FieldValue::serialized(data));
        self.with_fields(fields)
    }

    pub fn set_level(&self, level: Level) {
        self.state.write().config.level = level;
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.state.write().config.formatter = formatter;
    }

    pub fn set_writer(&self, writer: Arc<dyn Writer>) {
        self.state.write().config.writer = writer;
    }

    pub fn set_timezone(&self, timezone: TimeZone) {
        self.state.write().config.timezone = timezone;
    }

    pub fn set_file_line(&self, enabled: bool) {
        self.state.write().config.file_line = enabled;
    }

    pub fn set_dynamic_module_name(&self, enabled: bool) {
        self.state.write().config.dynamic_module_name = enabled;
    }

    pub fn set_global_fields(&self, inject: Option<GlobalFieldsFn>) {
        self.state.write().config.global_fields = inject;
    }

    pub fn set_failure_policy(&self, policy: FailurePolicy) {
        self.state.write().config.failure_policy = policy;
    }

    /// Replace the whole configuration; module filters are kept
    pub fn set_config(&self, config: ModuleConfig) {
        self.state.write().config = config;
    }

    pub(crate) fn update_config<F>(&self, update: F)
    where
        F: FnOnce(&mut ModuleConfig),
    {
        update(&mut self.state.write().config);
    }

    /// Append a module filter; it runs after every filter added before it
    pub fn add_filter(&self, filter: SharedFilter) {
        self.state.write().filters.push(filter);
    }

    pub fn clear_filters(&self) {
        self.state.write().filters.clear();
    }

    pub fn filter_count(&self) -> usize {
        self.state.read().filters.len()
    }

    /// Reopen the module's writer
    pub fn reopen(&self) -> Result<()> {
        let writer = Arc::clone(&self.state.read().config.writer);
        writer.reopen()
    }

    /// Close the module's writer
    pub fn close(&self) -> Result<()> {
        let writer = Arc::clone(&self.state.read().config.writer);
        writer.close()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("config", &state.config)
            .field("filters", &state.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::filter_fn;
    use parking_lot::Mutex;

    /// Captures (level, module, text) triples
    #[derive(Default)]
    struct MemoryWriter {
        records: Mutex<Vec<(Level, String, String)>>,
    }

    impl Writer for MemoryWriter {
        fn write(&self, level: Level, module: &str, text: &str) -> Result<()> {
            self.records.lock().push((level, module.to_string(), text.to_string()));
            Ok(())
        }

        fn reopen(&self) -> Result<()> {
            Ok(())
        }

        fn close(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct FailingWriter;

    impl Writer for FailingWriter {
        fn write(&self, _level: Level, _module: &str, _text: &str) -> Result<()> {
            Err(LoggerError::other("sink unavailable"))
        }

        fn reopen(&self) -> Result<()> {
            Ok(())
        }

        fn close(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn memory_logger(name: &str) -> (Arc<Logger>, Arc<MemoryWriter>) {
        let writer = Arc::new(MemoryWriter::default());
        let config = ModuleConfig {
            formatter: Arc::new(|event: &Event| {
                format!("{} {}", event.message(), event.serialize())
            }),
            writer: writer.clone(),
            ..ModuleConfig::default()
        };
        (Arc::new(Logger::detached(name, config)), writer)
    }

    #[test]
    fn test_threshold_suppresses_lower_levels() {
        let (logger, writer) = memory_logger("svc");
        logger.set_level(Level::Warning);

        logger.debug("dropped");
        logger.info("dropped");
        logger.warning("kept");
        logger.emergency("kept");

        let records = writer.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Level::Warning);
        assert_eq!(logger.metrics().records_suppressed(), 2);
        assert_eq!(logger.metrics().records_written(), 2);
    }

    #[test]
    fn test_unnamed_module_uses_caller_package() {
        let (logger, writer) = memory_logger("");
        logger.info("who");

        let records = writer.records.lock();
        assert!(records[0].1.contains("core.logger"), "module was {:?}", records[0].1);
        assert_eq!(logger.name(), "");
    }

    #[test]
    fn test_named_module_keeps_its_name() {
        let (logger, writer) = memory_logger("svc");
        logger.info("who");

        assert_eq!(writer.records.lock()[0].1, "svc");
    }

    #[test]
    fn test_message_parts_are_concatenated() {
        let (logger, writer) = memory_logger("svc");
        logger.log_parts(Level::Info, ["a", "b", "c"]);

        assert_eq!(writer.records.lock()[0].2, "abc {}");
    }

    #[test]
    fn test_file_line_fields() {
        let (logger, writer) = memory_logger("svc");
        logger.set_file_line(true);

        let line = line!() + 1;
        logger.info("here");

        let text = writer.records.lock()[0].2.clone();
        let json: serde_json::Value =
            serde_json::from_str(text.trim_start_matches("here ")).unwrap();
        assert_eq!(json["#line"], serde_json::json!(line));
        assert!(json["#file"].as_str().unwrap().ends_with("logger.rs"));
        assert!(json["#package"].is_string());
    }

    #[test]
    fn test_injector_gets_fresh_fields_each_time() {
        let (logger, writer) = memory_logger("svc");
        logger.set_global_fields(Some(Arc::new(|fields: &mut Fields| {
            let seen = fields.global.len();
            fields.insert_global("seen_before", seen);
        })));

        logger.info("one");
        logger.info("two");

        let records = writer.records.lock();
        assert!(records[0].2.ends_with(r##"{"#seen_before":0}"##));
        assert!(records[1].2.ends_with(r##"{"#seen_before":0}"##));
    }

    #[test]
    fn test_module_filters_run_in_order() {
        let (logger, writer) = memory_logger("svc");
        logger.add_filter(Arc::new(filter_fn(|mut event, next| {
            event.fields.insert_global("order", "first");
            next.run(event)
        })));
        logger.add_filter(Arc::new(filter_fn(|mut event, next| {
            event.fields.insert_global("order", "second");
            next.run(event)
        })));

        logger.info("x");
        assert!(writer.records.lock()[0].2.contains(r##""#order":"second""##));
        assert_eq!(logger.filter_count(), 2);
    }

    #[test]
    fn test_with_binds_data_field() {
        let (logger, writer) = memory_logger("svc");
        logger.with(&vec![1, 2, 3]).info("data");

        assert_eq!(writer.records.lock()[0].2, r#"data {"@":[1,2,3]}"#);
    }

    #[test]
    fn test_report_and_continue_counts_failures() {
        let (logger, _writer) = memory_logger("svc");
        logger.set_writer(Arc::new(FailingWriter));
        logger.set_failure_policy(FailurePolicy::ReportAndContinue);

        logger.error("lost");
        logger.error("lost again");

        assert_eq!(logger.metrics().write_failures(), 2);
        assert_eq!(logger.metrics().records_written(), 0);
    }

    #[test]
    #[should_panic(expected = "sink unavailable")]
    fn test_abort_policy_panics() {
        let (logger, _writer) = memory_logger("svc");
        logger.set_writer(Arc::new(FailingWriter));
        logger.error("boom");
    }

    #[test]
    fn test_enabled_helpers() {
        let (logger, _writer) = memory_logger("svc");
        logger.set_level(Level::Notice);

        assert!(!logger.debug_enabled());
        assert!(!logger.info_enabled());
        assert!(logger.notice_enabled());
        assert!(logger.emergency_enabled());
    }
}
