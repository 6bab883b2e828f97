//! Logging environment: module registry plus default configuration
//!
//! An application owns one or more [`LogEnvironment`]s. Each keeps the
//! modules created through it, the defaults new modules start from, and the
//! filters that run in front of every module's own filters.
//!
//! Locking: the registry lock is always taken before a logger's own lock.
//! Emission takes the logger lock, releases it, and only then reads the
//! environment filters.

use super::{
    config::{EnvironmentConfig, FailurePolicy, GlobalFieldsFn, ModuleConfig},
    error::Result,
    filter::SharedFilter,
    formatter::Formatter,
    level::Level,
    logger::Logger,
    timestamp::TimeZone,
    writer::Writer,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct EnvState {
    modules: HashMap<String, Arc<Logger>>,
    defaults: ModuleConfig,
    global_filters: Vec<SharedFilter>,
}

/// Shared internals; loggers keep a weak reference back to it
pub(crate) struct Registry {
    state: RwLock<EnvState>,
}

impl Registry {
    pub(crate) fn global_filters(&self) -> Vec<SharedFilter> {
        self.state.read().global_filters.clone()
    }
}

/// Registry of modules and their default configuration
///
/// Cloning yields another handle to the same environment.
///
/// # Example
///
/// ```
/// use module_logger::prelude::*;
/// use std::sync::Arc;
///
/// let env = LogEnvironment::builder()
///     .level(Level::Info)
///     .formatter(Arc::new(JsonFormatter))
///     .build();
///
/// let db = env.module("app.db");
/// assert_eq!(db.level(), Level::Info);
/// assert!(Arc::ptr_eq(&db, &env.module("app.db")));
/// ```
#[derive(Clone)]
pub struct LogEnvironment {
    registry: Arc<Registry>,
}

impl LogEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(ModuleConfig::default(), Vec::new())
    }

    fn with_defaults(defaults: ModuleConfig, global_filters: Vec<SharedFilter>) -> Self {
        Self {
            registry: Arc::new(Registry {
                state: RwLock::new(EnvState {
                    modules: HashMap::new(),
                    defaults,
                    global_filters,
                }),
            }),
        }
    }

    #[must_use]
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::new()
    }

    #[must_use]
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::with_defaults(config.module_config(), Vec::new())
    }

    /// Existing module with this name, or a new one seeded from a copy of the
    /// current defaults
    pub fn module(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.registry.state.read().modules.get(name) {
            return Arc::clone(logger);
        }

        let mut guard = self.registry.state.write();
        let state = &mut *guard;
        let defaults = &state.defaults;
        let registry = Arc::downgrade(&self.registry);
        let logger = state
            .modules
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::new(name, defaults.clone(), registry)));
        Arc::clone(logger)
    }

    /// The module with the empty name
    pub fn default_module(&self) -> Arc<Logger> {
        self.module("")
    }

    /// Names of all registered modules, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.state.read().modules.keys().cloned().collect();
        names.sort();
        names
    }

    /// Copy of the configuration new modules start from
    pub fn defaults(&self) -> ModuleConfig {
        self.registry.state.read().defaults.clone()
    }

    /// Append a filter that runs before the filters of every module
    pub fn add_global_filter(&self, filter: SharedFilter) {
        self.registry.state.write().global_filters.push(filter);
    }

    pub fn global_filters(&self) -> Vec<SharedFilter> {
        self.registry.global_filters()
    }

    pub fn clear_global_filters(&self) {
        self.registry.state.write().global_filters.clear();
    }

    /// Apply `update` to the defaults and to every registered module
    fn apply_to_all<F>(&self, update: F)
    where
        F: Fn(&mut ModuleConfig),
    {
        let mut state = self.registry.state.write();
        update(&mut state.defaults);
        for logger in state.modules.values() {
            logger.update_config(&update);
        }
    }

    pub fn set_level(&self, level: Level) {
        self.apply_to_all(|config| config.level = level);
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.apply_to_all(|config| config.formatter = Arc::clone(&formatter));
    }

    pub fn set_writer(&self, writer: Arc<dyn Writer>) {
        self.apply_to_all(|config| config.writer = Arc::clone(&writer));
    }

    pub fn set_timezone(&self, timezone: TimeZone) {
        self.apply_to_all(|config| config.timezone = timezone);
    }

    pub fn set_dynamic_module_name(&self, enabled: bool) {
        self.apply_to_all(|config| config.dynamic_module_name = enabled);
    }

    pub fn set_file_line(&self, enabled: bool) {
        self.apply_to_all(|config| config.file_line = enabled);
    }

    pub fn set_failure_policy(&self, policy: FailurePolicy) {
        self.apply_to_all(|config| config.failure_policy = policy);
    }

    pub fn set_global_fields(&self, inject: Option<GlobalFieldsFn>) {
        self.apply_to_all(|config| config.global_fields = inject.clone());
    }

    fn loggers(&self) -> Vec<Arc<Logger>> {
        self.registry.state.read().modules.values().cloned().collect()
    }

    /// Reopen the writer of every module
    pub fn reopen_all(&self) -> HashMap<String, Result<()>> {
        self.loggers()
            .into_iter()
            .map(|logger| (logger.name().to_string(), logger.reopen()))
            .collect()
    }

    /// Close the writer of every module
    pub fn close_all(&self) -> HashMap<String, Result<()>> {
        self.loggers()
            .into_iter()
            .map(|logger| (logger.name().to_string(), logger.close()))
            .collect()
    }

    /// Forget all modules and environment filters and restore the default
    /// configuration.
    ///
    /// Meant for test isolation. Loggers handed out earlier keep working
    /// with their own configuration but are no longer returned by
    /// [`module`](Self::module).
    pub fn reset(&self) {
        let mut state = self.registry.state.write();
        state.modules.clear();
        state.global_filters.clear();
        state.defaults = ModuleConfig::default();
    }
}

impl Default for LogEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.registry.state.read();
        f.debug_struct("LogEnvironment")
            .field("modules", &state.modules.len())
            .field("defaults", &state.defaults)
            .field("global_filters", &state.global_filters.len())
            .finish()
    }
}

/// Builder for a [`LogEnvironment`] with a fluent API
pub struct EnvironmentBuilder {
    defaults: ModuleConfig,
    global_filters: Vec<SharedFilter>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self {
            defaults: ModuleConfig::default(),
            global_filters: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.defaults.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.defaults.formatter = formatter;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, writer: Arc<dyn Writer>) -> Self {
        self.defaults.writer = writer;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timezone(mut self, timezone: TimeZone) -> Self {
        self.defaults.timezone = timezone;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_line(mut self, enabled: bool) -> Self {
        self.defaults.file_line = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn dynamic_module_name(mut self, enabled: bool) -> Self {
        self.defaults.dynamic_module_name = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.defaults.failure_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_fields(mut self, inject: GlobalFieldsFn) -> Self {
        self.defaults.global_fields = Some(inject);
        self
    }

    /// Add an environment-wide filter; filters run in the order added
    #[must_use = "builder methods return a new value"]
    pub fn global_filter(mut self, filter: SharedFilter) -> Self {
        self.global_filters.push(filter);
        self
    }

    pub fn build(self) -> LogEnvironment {
        LogEnvironment::with_defaults(self.defaults, self.global_filters)
    }
}

impl Default for EnvironmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{filter::filter_fn, Fields};

    #[test]
    fn test_module_is_cached() {
        let env = LogEnvironment::new();
        let a = env.module("svc");
        let b = env.module("svc");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(env.module_names(), vec!["svc".to_string()]);
    }

    #[test]
    fn test_default_module_has_empty_name() {
        let env = LogEnvironment::new();
        assert_eq!(env.default_module().name(), "");
    }

    #[test]
    fn test_new_modules_copy_defaults() {
        let env = LogEnvironment::builder().level(Level::Error).build();
        let first = env.module("first");
        first.set_level(Level::Debug);

        let second = env.module("second");
        assert_eq!(second.level(), Level::Error);
        assert_eq!(env.defaults().level, Level::Error);
    }

    #[test]
    fn test_bulk_setter_reaches_existing_and_future_modules() {
        let env = LogEnvironment::new();
        let existing = env.module("existing");

        env.set_level(Level::Critical);
        env.set_timezone(TimeZone::Utc);

        assert_eq!(existing.level(), Level::Critical);
        assert_eq!(existing.config().timezone, TimeZone::Utc);
        assert_eq!(env.module("future").level(), Level::Critical);
    }

    #[test]
    fn test_bulk_setter_keeps_module_filters() {
        let env = LogEnvironment::new();
        let logger = env.module("svc");
        logger.add_filter(Arc::new(filter_fn(|event, next| next.run(event))));

        env.set_file_line(true);

        assert_eq!(logger.filter_count(), 1);
        assert!(logger.config().file_line);
    }

    #[test]
    fn test_global_fields_injector_is_shared_not_state() {
        let env = LogEnvironment::new();
        env.set_global_fields(Some(Arc::new(|fields: &mut Fields| {
            fields.insert_global("host", "web-1");
        })));

        assert!(env.module("svc").config().global_fields.is_some());
        assert!(env.defaults().global_fields.is_some());
    }

    #[test]
    fn test_reset_clears_registry() {
        let env = LogEnvironment::new();
        let before = env.module("svc");
        env.set_level(Level::Alert);
        env.add_global_filter(Arc::new(filter_fn(|event, next| next.run(event))));

        env.reset();

        assert!(env.module_names().is_empty());
        assert!(env.global_filters().is_empty());
        assert_eq!(env.defaults().level, Level::Debug);
        assert!(!Arc::ptr_eq(&before, &env.module("svc")));
    }

    #[test]
    fn test_from_config() {
        let config = EnvironmentConfig {
            level: Level::Notice,
            ..EnvironmentConfig::default()
        };
        let env = LogEnvironment::from_config(&config);
        assert_eq!(env.module("svc").level(), Level::Notice);
    }

    #[test]
    fn test_reopen_all_reports_per_module() {
        let env = LogEnvironment::new();
        env.module("a");
        env.module("b");

        let results = env.reopen_all();
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|r| r.is_ok()));
    }
}
