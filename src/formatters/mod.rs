//! Formatter implementations

pub mod json;
pub mod text;

pub use json::{JsonFormatter, JsonWithTimeFormatter};
pub use text::{colored_level_tag, strip_control_and_extended, DefaultFormatter};

pub use crate::core::Formatter;
