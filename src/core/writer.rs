//! Writer trait for log output destinations

use super::{error::Result, level::Level};

/// Sink for formatted records
///
/// Writers are shared between modules behind an `Arc`, so every method takes
/// `&self` and implementations guard their handles internally. Concurrent
/// `write` calls on one instance must never interleave partial records.
pub trait Writer: Send + Sync {
    /// Emit one formatted record
    fn write(&self, level: Level, module: &str, text: &str) -> Result<()>;

    /// Release and reacquire the output handle (log rotation hook)
    fn reopen(&self) -> Result<()>;

    /// Flush and release the output handle
    fn close(&self) -> Result<()>;

    fn name(&self) -> &str;
}
