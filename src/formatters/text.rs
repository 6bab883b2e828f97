//! Human-readable text formatter

use crate::core::{abbreviate_module, Event, Formatter, Level};
use colored::{ColoredString, Colorize};
use unicode_normalization::UnicodeNormalization;

/// `[time] LEVEL module message {fields}`
///
/// The colorful variant prints a colored `[ABBR]` level tag, abbreviates
/// the module name into a 20 column slot and dims the field JSON. Lines
/// after the first are indented with a tab.
///
/// # Examples
///
/// ```
/// use module_logger::formatters::DefaultFormatter;
/// use module_logger::{Event, Fields, Formatter, Level, TimeZone};
///
/// let event = Event::new(
///     TimeZone::Utc.now(),
///     "test",
///     Level::Alert,
///     Fields::new().with_custom("uid", 134),
///     vec!["Hello, world".to_string()],
/// );
///
/// let text = DefaultFormatter::new(false).format(&event);
/// assert!(text.ends_with(r#"ALERT test Hello, world {"uid":134}"#));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter {
    colorful: bool,
    clean: bool,
}

impl DefaultFormatter {
    pub fn new(colorful: bool) -> Self {
        Self {
            colorful,
            clean: false,
        }
    }

    /// Also drop control and non-ASCII characters from the message
    pub fn clean(colorful: bool) -> Self {
        Self {
            colorful,
            clean: true,
        }
    }

    pub fn is_colorful(&self) -> bool {
        self.colorful
    }

    fn body(&self, event: &Event) -> String {
        let message = event.message();
        let trimmed = message.trim_matches('\n');
        if self.clean {
            strip_control_and_extended(trimmed)
        } else {
            trimmed.to_string()
        }
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, event: &Event) -> String {
        let body = self.body(event);

        let line = if self.colorful {
            format!(
                "[{}] {} {:<20} {} {}",
                event.datetime(),
                colored_level_tag(event.level),
                abbreviate_module(&event.module),
                body,
                event.serialize().bright_black(),
            )
        } else {
            format!(
                "[{}] {} {} {} {}",
                event.datetime(),
                event.level.name(),
                event.module,
                body,
                event.serialize(),
            )
        };

        line.replace('\n', "\n\t")
            .trim_matches(|c| c == '\n' || c == '\t')
            .to_string()
    }

    fn name(&self) -> &str {
        if self.colorful {
            "text_colorful"
        } else {
            "text"
        }
    }
}

/// `[ABBR]` with the level's foreground and background colors
pub fn colored_level_tag(level: Level) -> ColoredString {
    let tag = format!("[{}]", level.abbreviation());
    match level {
        Level::Debug => tag.bright_white().on_blue(),
        Level::Info => tag.bright_white().on_cyan(),
        Level::Notice => tag.bright_white().on_yellow(),
        Level::Warning => tag.red().on_yellow(),
        Level::Error => tag.bright_white().on_red(),
        Level::Critical | Level::Alert | Level::Emergency => tag.bright_white().on_bright_red(),
    }
}

/// Decompose to NFKD, then remove every character below 32 or above 126
///
/// Accented letters keep their base letter: `café` becomes `cafe`.
pub fn strip_control_and_extended(text: &str) -> String {
    text.nfkd().filter(|c| (' '..='~').contains(c)).collect()
}
