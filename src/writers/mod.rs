//! Writer implementations

pub mod console;
pub mod file;
pub mod rotating_file;
pub mod stack;
pub mod syslog;

pub use console::StreamWriter;
pub use file::{FileOptions, FileWriter};
pub use rotating_file::{GcHandle, RotatingFileWriter, RouteFn};
pub use stack::{MatchFn, StackWriter};
pub use syslog::{Facility, SyslogTransport, SyslogWriter};

pub use crate::core::Writer;
