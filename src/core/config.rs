//! Module configuration and environment settings

use super::{
    fields::Fields, formatter::Formatter, level::Level, timestamp::TimeZone, writer::Writer,
};
use crate::formatters::{DefaultFormatter, JsonFormatter, JsonWithTimeFormatter};
use crate::writers::StreamWriter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Hook that adds global fields to every record of a module
///
/// Runs after call-site capture and before the filter chain. It receives the
/// event's own field set, so nothing it writes leaks into other records.
pub type GlobalFieldsFn = Arc<dyn Fn(&mut Fields) + Send + Sync>;

/// What happens when a record fails inside the filter chain or writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Panic at the log call site
    #[default]
    Abort,

    /// Print `[LOGGER ERROR]` to stderr and carry on
    ReportAndContinue,

    /// Only count the failure
    Silent,
}

/// Settings of one module
///
/// Cloning is cheap: the formatter, writer and injector are shared handles.
#[derive(Clone)]
pub struct ModuleConfig {
    pub level: Level,
    pub formatter: Arc<dyn Formatter>,
    pub writer: Arc<dyn Writer>,
    pub timezone: TimeZone,
    /// Record `file`, `line`, `package` and `func` global fields
    pub file_line: bool,
    /// Name records after the calling package instead of the module
    pub dynamic_module_name: bool,
    pub global_fields: Option<GlobalFieldsFn>,
    pub failure_policy: FailurePolicy,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            formatter: Arc::new(DefaultFormatter::new(true)),
            writer: Arc::new(StreamWriter::stdout()),
            timezone: TimeZone::Local,
            file_line: false,
            dynamic_module_name: false,
            global_fields: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl fmt::Debug for ModuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleConfig")
            .field("level", &self.level)
            .field("formatter", &self.formatter.name())
            .field("writer", &self.writer.name())
            .field("timezone", &self.timezone)
            .field("file_line", &self.file_line)
            .field("dynamic_module_name", &self.dynamic_module_name)
            .field("global_fields", &self.global_fields.is_some())
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

/// Built-in output formats selectable from configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonWithTime,
}

/// Serializable environment defaults
///
/// Writers are not configurable here; records go to stdout until a writer is
/// set in code.
///
/// ```
/// use module_logger::{EnvironmentConfig, Level};
///
/// let config: EnvironmentConfig =
///     serde_json::from_str(r#"{"level":"warning","format":"json"}"#).unwrap();
/// assert_eq!(config.level, Level::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub level: Level,
    pub timezone: TimeZone,
    pub file_line: bool,
    pub dynamic_module_name: bool,
    pub failure_policy: FailurePolicy,
    pub colorful: bool,
    pub format: OutputFormat,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            timezone: TimeZone::Local,
            file_line: false,
            dynamic_module_name: false,
            failure_policy: FailurePolicy::Abort,
            colorful: true,
            format: OutputFormat::Text,
        }
    }
}

impl EnvironmentConfig {
    pub fn formatter(&self) -> Arc<dyn Formatter> {
        match self.format {
            OutputFormat::Text => Arc::new(DefaultFormatter::new(self.colorful)),
            OutputFormat::Json => Arc::new(JsonFormatter),
            OutputFormat::JsonWithTime => Arc::new(JsonWithTimeFormatter),
        }
    }

    /// Module defaults described by this configuration
    pub fn module_config(&self) -> ModuleConfig {
        ModuleConfig {
            level: self.level,
            formatter: self.formatter(),
            timezone: self.timezone,
            file_line: self.file_line,
            dynamic_module_name: self.dynamic_module_name,
            failure_policy: self.failure_policy,
            ..ModuleConfig::default()
        }
    }
}
