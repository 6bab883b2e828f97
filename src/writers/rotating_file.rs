//! Multi-file writer that routes records to files by level and module
//!
//! Every destination path gets its own lazily opened [`FileWriter`]. The
//! map of open files has its own lock, so opening or evicting one file never
//! blocks a write that is already in progress on another. Files that have
//! not been modified for a while can be closed by [`RotatingFileWriter::gc`],
//! either by hand or from a background thread started with
//! [`RotatingFileWriter::auto_gc`].

use super::file::{FileOptions, FileWriter};
use crate::core::{Level, LoggerError, Result, Writer};
use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// Picks the destination file for a record
pub type RouteFn = Arc<dyn Fn(Level, &str) -> PathBuf + Send + Sync>;

/// Routes records to a set of files
///
/// # Examples
///
/// ```no_run
/// use module_logger::writers::RotatingFileWriter;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// // One file per module and day
/// let writer = Arc::new(RotatingFileWriter::new(|_level, module: &str| {
///     let day = chrono::Local::now().format("%Y-%m-%d");
///     format!("/var/log/app/{}.{}.log", module, day).into()
/// }));
///
/// // Close files idle for an hour, checking every ten minutes
/// let gc = writer.auto_gc(Duration::from_secs(600), Duration::from_secs(3600));
/// # drop(gc);
/// ```
pub struct RotatingFileWriter {
    route: RouteFn,
    options: FileOptions,
    files: Mutex<HashMap<PathBuf, Arc<FileWriter>>>,
}

impl RotatingFileWriter {
    pub fn new<F>(route: F) -> Self
    where
        F: Fn(Level, &str) -> PathBuf + Send + Sync + 'static,
    {
        Self::with_options(route, FileOptions::default())
    }

    pub fn with_options<F>(route: F, options: FileOptions) -> Self
    where
        F: Fn(Level, &str) -> PathBuf + Send + Sync + 'static,
    {
        Self {
            route: Arc::new(route),
            options,
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Paths with an entry in the file map, sorted
    pub fn open_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn file_for(&self, path: PathBuf) -> Arc<FileWriter> {
        let mut files = self.files.lock();
        let options = self.options;
        Arc::clone(
            files
                .entry(path)
                .or_insert_with_key(|path| {
                    Arc::new(FileWriter::with_options(path.clone(), options))
                }),
        )
    }

    fn snapshot(&self) -> Vec<Arc<FileWriter>> {
        self.files.lock().values().cloned().collect()
    }

    /// Close and forget files unmodified for longer than `inactive`
    ///
    /// Returns the number of evicted files. Files whose metadata can no
    /// longer be read (deleted or moved away) are evicted as well.
    pub fn gc(&self, inactive: Duration) -> usize {
        let now = SystemTime::now();
        let expired: Vec<Arc<FileWriter>> = {
            let mut files = self.files.lock();
            let stale: Vec<PathBuf> = files
                .iter()
                .filter(|(_, file)| match file.last_modified() {
                    Ok(modified) => modified
                        .checked_add(inactive)
                        .map_or(false, |deadline| deadline < now),
                    Err(_) => true,
                })
                .map(|(path, _)| path.clone())
                .collect();

            stale.iter().filter_map(|path| files.remove(path)).collect()
        };

        for file in &expired {
            if let Err(e) = file.close() {
                eprintln!("[LOGGER ERROR] gc failed to close {}: {}", file.path().display(), e);
            }
        }

        expired.len()
    }

    /// Run [`gc`](Self::gc) every `interval` on a background thread
    ///
    /// The thread stops when the returned handle is cancelled or dropped,
    /// or when the writer itself is gone.
    pub fn auto_gc(self: &Arc<Self>, interval: Duration, inactive: Duration) -> GcHandle {
        let (cancel, cancelled) = bounded::<()>(1);
        let ticker = tick(interval);
        let writer: Weak<Self> = Arc::downgrade(self);

        let thread = thread::spawn(move || loop {
            select! {
                recv(ticker) -> _ => match writer.upgrade() {
                    Some(writer) => {
                        writer.gc(inactive);
                    }
                    None => break,
                },
                recv(cancelled) -> _ => break,
            }
        });

        GcHandle {
            cancel: Some(cancel),
            thread: Some(thread),
        }
    }
}

impl Writer for RotatingFileWriter {
    fn write(&self, level: Level, module: &str, text: &str) -> Result<()> {
        let path = (self.route)(level, module);
        self.file_for(path).write(level, module, text)
    }

    fn reopen(&self) -> Result<()> {
        let errors: Vec<LoggerError> = self
            .snapshot()
            .iter()
            .filter_map(|file| file.reopen().err())
            .collect();
        LoggerError::from_many(errors).map_or(Ok(()), Err)
    }

    fn close(&self) -> Result<()> {
        let files: Vec<Arc<FileWriter>> = self.files.lock().drain().map(|(_, file)| file).collect();
        let errors: Vec<LoggerError> = files.iter().filter_map(|file| file.close().err()).collect();
        LoggerError::from_many(errors).map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

/// Background GC thread started by [`RotatingFileWriter::auto_gc`]
pub struct GcHandle {
    cancel: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl GcHandle {
    /// Stop the thread and wait for it to exit
    pub fn cancel(mut self) {
        self.stop();
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().map_or(false, |thread| !thread.is_finished())
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                eprintln!("[LOGGER ERROR] gc thread panicked");
            }
        }
    }
}

impl Drop for GcHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
