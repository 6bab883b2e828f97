//! Time zone selection and timestamp rendering
//!
//! Every module carries a [`TimeZone`]; events are stamped in that zone and
//! rendered as RFC 3339 with second precision (`2025-01-08T10:30:45+08:00`,
//! or a trailing `Z` for UTC).

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Time zone used to stamp events of a module
///
/// # Examples
///
/// ```
/// use module_logger::TimeZone;
///
/// let tz = TimeZone::offset_hours(8);
/// let now = tz.now();
/// assert_eq!(now.offset().local_minus_utc(), 8 * 3600);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZone {
    /// The host's local zone
    #[default]
    Local,

    /// Coordinated Universal Time
    Utc,

    /// Fixed offset east of UTC, in seconds
    Offset(i32),
}

impl TimeZone {
    /// Fixed offset from whole hours east of UTC
    #[must_use]
    pub fn offset_hours(hours: i32) -> Self {
        TimeZone::Offset(hours * 3600)
    }

    /// Current time in this zone
    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.convert(Utc::now())
    }

    /// Convert a UTC instant into this zone.
    ///
    /// Offsets outside chrono's valid range (±24h) fall back to UTC.
    #[must_use]
    pub fn convert(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            TimeZone::Local => instant.with_timezone(&Local).fixed_offset(),
            TimeZone::Utc => instant.fixed_offset(),
            TimeZone::Offset(seconds) => match FixedOffset::east_opt(*seconds) {
                Some(offset) => instant.with_timezone(&offset),
                None => instant.fixed_offset(),
            },
        }
    }
}

/// Render a timestamp as RFC 3339 with whole seconds
#[must_use]
pub fn format_rfc3339(datetime: &DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}
