//! Log event structure

use super::fields::Fields;
use super::level::Level;
use super::timestamp::format_rfc3339;
use chrono::{DateTime, FixedOffset};

/// A single log record travelling through the filter chain
///
/// Built once per emitted log call and consumed by exactly one chain run.
/// Filters receive it by value, so changes a filter makes are only visible to
/// the stages after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: DateTime<FixedOffset>,
    pub module: String,
    pub level: Level,
    pub fields: Fields,
    pub messages: Vec<String>,
}

impl Event {
    pub fn new(
        time: DateTime<FixedOffset>,
        module: impl Into<String>,
        level: Level,
        fields: Fields,
        messages: Vec<String>,
    ) -> Self {
        Self {
            time,
            module: module.into(),
            level,
            fields,
            messages,
        }
    }

    /// Message parts concatenated in order
    pub fn message(&self) -> String {
        self.messages.concat()
    }

    /// Event time as RFC 3339
    pub fn datetime(&self) -> String {
        format_rfc3339(&self.time)
    }

    /// Flattened fields, see [`Fields::to_map`]
    pub fn to_map(&self, excluding: &[&str]) -> serde_json::Map<String, serde_json::Value> {
        self.fields.to_map(excluding)
    }

    /// JSON encoding of the flattened fields
    pub fn serialize(&self) -> String {
        self.fields.serialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::TimeZone;

    fn sample() -> Event {
        Event::new(
            TimeZone::Utc.now(),
            "app.http",
            Level::Info,
            Fields::new().with_custom("uid", 7).with_global("ref", "x"),
            vec!["Hello, ".to_string(), "world".to_string()],
        )
    }

    #[test]
    fn test_message_concatenation() {
        assert_eq!(sample().message(), "Hello, world");
    }

    #[test]
    fn test_serialize_is_repeatable() {
        let event = sample();
        let first = event.serialize();
        assert_eq!(first, event.serialize());
        assert_eq!(first, r##"{"#ref":"x","uid":7}"##);
    }

    #[test]
    fn test_clone_does_not_share_fields() {
        let original = sample();
        let mut copy = original.clone();
        copy.fields.insert_global("extra", true);

        assert!(!original.fields.global.contains_key("extra"));
        assert_eq!(original.serialize(), r##"{"#ref":"x","uid":7}"##);
    }
}
