//! Log level definitions
//!
//! Levels follow the syslog severities. Numeric values grow with severity, so
//! a module emits a record iff `record.level >= threshold`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Name returned for values that do not map to a level
pub const UNKNOWN_LEVEL_NAME: &str = "UNKNOWN";

/// Abbreviation returned for values that do not map to a level
pub const UNKNOWN_LEVEL_ABBREVIATION: &str = "UNON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug = 100,
    Info = 200,
    Notice = 250,
    Warning = 300,
    Error = 400,
    Critical = 500,
    Alert = 550,
    Emergency = 600,
}

impl Level {
    /// All levels, least severe first
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Level::Emergency => "EMERGENCY",
            Level::Alert => "ALERT",
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Four-letter tag used by the colorful text formatter
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Level::Emergency => "EMCY",
            Level::Alert => "ALER",
            Level::Critical => "CRIT",
            Level::Error => "EROR",
            Level::Warning => "WARN",
            Level::Notice => "NOTI",
            Level::Info => "INFO",
            Level::Debug => "DEBG",
        }
    }

    /// Numeric value written to JSON records
    #[inline]
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// Look up a level by its numeric value
    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.value() == value)
    }

    /// Case-insensitive lookup by name; `None` means unknown.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "EMERGENCY" => Some(Level::Emergency),
            "ALERT" => Some(Level::Alert),
            "CRITICAL" => Some(Level::Critical),
            "ERROR" => Some(Level::Error),
            "WARNING" => Some(Level::Warning),
            "NOTICE" => Some(Level::Notice),
            "INFO" => Some(Level::Info),
            "DEBUG" => Some(Level::Debug),
            _ => None,
        }
    }

    /// Severity code as defined by RFC 5424 (Emergency = 0, Debug = 7)
    pub fn syslog_severity(&self) -> u8 {
        match self {
            Level::Emergency => 0,
            Level::Alert => 1,
            Level::Critical => 2,
            Level::Error => 3,
            Level::Warning => 4,
            Level::Notice => 5,
            Level::Info => 6,
            Level::Debug => 7,
        }
    }

    pub fn is_in(&self, candidates: &[Level]) -> bool {
        candidates.contains(self)
    }
}

/// Name for a raw level value, `UNKNOWN` when it matches no level
pub fn level_name(value: i32) -> &'static str {
    Level::from_value(value).map_or(UNKNOWN_LEVEL_NAME, |level| level.name())
}

/// Abbreviation for a raw level value, `UNON` when it matches no level
pub fn level_abbreviation(value: i32) -> &'static str {
    Level::from_value(value).map_or(UNKNOWN_LEVEL_ABBREVIATION, |level| level.abbreviation())
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s).ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
