//! Core logger types and traits

pub mod callsite;
pub mod config;
pub mod context;
pub mod environment;
pub mod error;
pub mod event;
pub mod fields;
pub mod filter;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod timestamp;
pub mod writer;

pub use callsite::{capture_call_site, CallSite};
pub use config::{EnvironmentConfig, FailurePolicy, GlobalFieldsFn, ModuleConfig, OutputFormat};
pub use context::ContextLogger;
pub use environment::{EnvironmentBuilder, LogEnvironment};
pub use error::{LoggerError, Result};
pub use event::Event;
pub use fields::{field_map, FieldMap, FieldValue, Fields, GLOBAL_FIELD_PREFIX};
pub use filter::{filter_fn, Filter, FilterChain, FilterFn, Next, SharedFilter};
pub use formatter::{abbreviate_module, Formatter};
pub use level::{level_abbreviation, level_name, Level};
pub use logger::{Logger, DATA_FIELD};
pub use metrics::LoggerMetrics;
pub use timestamp::{format_rfc3339, TimeZone};
pub use writer::Writer;
