//! Fan-out writer delivering records to several writers

use crate::core::{Level, LoggerError, Result, Writer};
use parking_lot::RwLock;
use std::sync::Arc;

/// Decides whether a stacked writer receives a record: (level, module, text)
pub type MatchFn = Arc<dyn Fn(Level, &str, &str) -> bool + Send + Sync>;

/// Ordered list of writers, each guarded by a predicate
///
/// A record goes to every writer whose predicate accepts it, even when an
/// earlier writer failed. One failure is returned as-is; several come back
/// as [`LoggerError::Stack`].
///
/// ```
/// use module_logger::writers::{StackWriter, StreamWriter};
/// use module_logger::Level;
/// use std::sync::Arc;
///
/// let stack = StackWriter::new();
/// stack.push_with_levels(Arc::new(StreamWriter::stderr()), &[Level::Error, Level::Emergency]);
/// stack.push_with_levels(Arc::new(StreamWriter::stdout()), &[]);
/// assert_eq!(stack.len(), 2);
/// ```
#[derive(Default)]
pub struct StackWriter {
    writers: RwLock<Vec<(Arc<dyn Writer>, MatchFn)>>,
}

impl StackWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a writer with an arbitrary predicate
    pub fn push<F>(&self, writer: Arc<dyn Writer>, matches: F)
    where
        F: Fn(Level, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.writers.write().push((writer, Arc::new(matches)));
    }

    /// Add a writer receiving only the given levels; an empty list matches all
    pub fn push_with_levels(&self, writer: Arc<dyn Writer>, levels: &[Level]) {
        let levels = levels.to_vec();
        self.push(writer, move |level, _module, _text| {
            levels.is_empty() || level.is_in(&levels)
        });
    }

    pub fn len(&self) -> usize {
        self.writers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.read().is_empty()
    }

    fn writers(&self) -> Vec<Arc<dyn Writer>> {
        self.writers
            .read()
            .iter()
            .map(|(writer, _)| Arc::clone(writer))
            .collect()
    }
}

impl Writer for StackWriter {
    fn write(&self, level: Level, module: &str, text: &str) -> Result<()> {
        let targets: Vec<Arc<dyn Writer>> = self
            .writers
            .read()
            .iter()
            .filter(|(_, matches)| matches(level, module, text))
            .map(|(writer, _)| Arc::clone(writer))
            .collect();

        let errors: Vec<LoggerError> = targets
            .iter()
            .filter_map(|writer| writer.write(level, module, text).err())
            .collect();
        LoggerError::from_many(errors).map_or(Ok(()), Err)
    }

    fn reopen(&self) -> Result<()> {
        let errors: Vec<LoggerError> = self
            .writers()
            .iter()
            .filter_map(|writer| writer.reopen().err())
            .collect();
        LoggerError::from_many(errors).map_or(Ok(()), Err)
    }

    fn close(&self) -> Result<()> {
        let errors: Vec<LoggerError> = self
            .writers()
            .iter()
            .filter_map(|writer| writer.close().err())
            .collect();
        LoggerError::from_many(errors).map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "stack"
    }
}
