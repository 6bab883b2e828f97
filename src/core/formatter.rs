//! Formatter trait for turning events into text

use super::event::Event;

/// Pure transformation from an event to its textual representation
///
/// Implementations are shared between modules and called for every emitted
/// record, so they must not keep per-call state.
pub trait Formatter: Send + Sync {
    fn format(&self, event: &Event) -> String;

    fn name(&self) -> &str;
}

impl<F> Formatter for F
where
    F: Fn(&Event) -> String + Send + Sync,
{
    fn format(&self, event: &Event) -> String {
        self(event)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Abbreviate a dotted module name.
///
/// Every segment except the last is reduced to its first character; empty
/// segments are dropped. Characters are kept whole, so `中文.布尔` becomes
/// `中.布尔`.
///
/// ```
/// use module_logger::core::formatter::abbreviate_module;
///
/// assert_eq!(abbreviate_module("abc.def.ghi"), "a.d.ghi");
/// assert_eq!(abbreviate_module("xxx..abc"), "x.abc");
/// ```
pub fn abbreviate_module(module: &str) -> String {
    let Some((head, last)) = module.rsplit_once('.') else {
        return module.to_string();
    };

    let mut parts: Vec<&str> = head
        .split('.')
        .filter_map(|segment| {
            segment
                .chars()
                .next()
                .map(|c| &segment[..c.len_utf8()])
        })
        .collect();
    parts.push(last);
    parts.join(".")
}
