//! Call-site capture for file/line fields and dynamic module names
//!
//! File and line come from `#[track_caller]`, which is exact. The function
//! name is looked up in the stack with the `backtrace` crate by matching the
//! frame whose debug info points at that same file and line. Builds without
//! debug info still get file and line; the package is then derived from the
//! source path.

use std::panic::Location;
use std::path::{Component, Path};

/// Where a log call was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    /// Fully qualified function path, e.g. `app::http::handle`
    pub function: Option<String>,
    /// Module path of the caller, e.g. `app::http`
    pub package: String,
}

impl CallSite {
    /// Package path with `::` replaced by dots, used as a module name
    pub fn module_name(&self) -> String {
        self.package.replace("::", ".")
    }
}

/// Capture the call site for `location`.
///
/// `skip_frames` innermost stack frames are ignored before searching for the
/// caller's frame.
pub fn capture_call_site(location: &Location<'_>, skip_frames: usize) -> CallSite {
    let function = resolve_function(location, skip_frames);
    let package = match &function {
        Some(function) => package_of(function),
        None => package_from_path(location.file()),
    };

    CallSite {
        file: location.file().to_string(),
        line: location.line(),
        function,
        package,
    }
}

fn resolve_function(location: &Location<'_>, skip_frames: usize) -> Option<String> {
    let target = Path::new(location.file());
    let mut function = None;
    let mut index = 0usize;

    backtrace::trace(|frame| {
        index += 1;
        if index <= skip_frames {
            return true;
        }

        backtrace::resolve_frame(frame, |symbol| {
            if function.is_some() {
                return;
            }
            let same_line = symbol.lineno() == Some(location.line());
            let same_file = symbol
                .filename()
                .map(|file| file.ends_with(target))
                .unwrap_or(false);
            if same_line && same_file {
                function = symbol.name().map(|name| format!("{:#}", name));
            }
        });

        function.is_none()
    });

    function
}

/// Drop the function name and closure markers from a qualified path
fn package_of(function: &str) -> String {
    let segments: Vec<&str> = function
        .split("::")
        .filter(|segment| !segment.starts_with("{{") && !segment.is_empty())
        .collect();

    match segments.split_last() {
        Some((_, parents)) if !parents.is_empty() => parents.join("::"),
        _ => function.to_string(),
    }
}

/// `src/http/handler.rs` becomes `http::handler`
fn package_from_path(file: &str) -> String {
    let path = Path::new(file).with_extension("");
    let mut segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if segments.first().map(String::as_str) == Some("src") {
        segments.remove(0);
    }
    if matches!(
        segments.last().map(String::as_str),
        Some("mod") | Some("lib") | Some("main")
    ) && segments.len() > 1
    {
        segments.pop();
    }

    segments.join("::")
}
