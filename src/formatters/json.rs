//! JSON formatters

use crate::core::{Event, Formatter};
use serde_json::{json, Value};

/// Serialized shape of a record
fn record(event: &Event) -> Value {
    json!({
        "module": event.module,
        "level_name": event.level.name(),
        "level": event.level.value(),
        "context": event.to_map(&[]),
        "message": event.message(),
        "datetime": event.datetime(),
    })
}

/// One JSON object per record
///
/// ```
/// use module_logger::formatters::JsonFormatter;
/// use module_logger::{Event, Fields, Formatter, Level, TimeZone};
///
/// let event = Event::new(TimeZone::Utc.now(), "billing", Level::Error,
///     Fields::new().with_custom("invoice", 42), vec!["declined".to_string()]);
///
/// let record: serde_json::Value = serde_json::from_str(&JsonFormatter.format(&event)).unwrap();
/// assert_eq!(record["level"], 400);
/// assert_eq!(record["context"]["invoice"], 42);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, event: &Event) -> String {
        record(event).to_string()
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// `[datetime] {json}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWithTimeFormatter;

impl Formatter for JsonWithTimeFormatter {
    fn format(&self, event: &Event) -> String {
        format!("[{}] {}", event.datetime(), record(event))
    }

    fn name(&self) -> &str {
        "json_with_time"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Level, TimeZone};

    fn event() -> Event {
        Event::new(
            TimeZone::offset_hours(8).now(),
            "test",
            Level::Alert,
            Fields::new().with_global("abc", "def").with_custom("uid", 134),
            vec!["Hello, ".to_string(), "world".to_string()],
        )
    }

    #[test]
    fn test_json_record_fields() {
        let e = event();
        let record: Value = serde_json::from_str(&JsonFormatter.format(&e)).unwrap();

        assert_eq!(
            record,
            json!({
                "module": "test",
                "level_name": "ALERT",
                "level": 550,
                "context": {"#abc": "def", "uid": 134},
                "message": "Hello, world",
                "datetime": e.datetime(),
            })
        );
    }

    #[test]
    fn test_json_with_time_envelope() {
        let e = event();
        let text = JsonWithTimeFormatter.format(&e);
        let prefix = format!("[{}] ", e.datetime());

        assert!(text.starts_with(&prefix));
        let record: Value = serde_json::from_str(&text[prefix.len()..]).unwrap();
        assert_eq!(record["message"], "Hello, world");
    }

    #[test]
    fn test_control_characters_stay_valid_json() {
        let e = Event::new(
            TimeZone::Utc.now(),
            "esc",
            Level::Info,
            Fields::new().with_custom("raw", "\u{1b}[31m"),
            vec!["bell\u{7} tab\t quote\"".to_string()],
        );

        let record: Value = serde_json::from_str(&JsonFormatter.format(&e)).unwrap();
        assert_eq!(record["message"], "bell\u{7} tab\t quote\"");
        assert_eq!(record["context"]["raw"], "\u{1b}[31m");
    }

    #[test]
    fn test_datetime_carries_offset() {
        let record: Value = serde_json::from_str(&JsonFormatter.format(&event())).unwrap();
        assert!(record["datetime"].as_str().unwrap().ends_with("+08:00"));
    }
}
