//! Single-file writer with lazy open and reopen support

use crate::core::{Level, LoggerError, Result, Writer};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// How the file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    pub append: bool,
    pub truncate: bool,
    /// Permission bits for newly created files (unix only)
    pub mode: u32,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            append: true,
            truncate: false,
            mode: 0o666,
        }
    }
}

/// Writes records to one file, opened on the first write
///
/// `close` syncs and releases the handle; `reopen` does the same and the
/// next write opens the path again, which picks up a file moved away by an
/// external rotation tool.
///
/// ```no_run
/// use module_logger::writers::FileWriter;
/// use module_logger::{Level, Writer};
///
/// let writer = FileWriter::new("/var/log/app.log");
/// writer.write(Level::Info, "app", "started").unwrap();
/// writer.reopen().unwrap();
/// ```
pub struct FileWriter {
    path: PathBuf,
    options: FileOptions,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, FileOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: FileOptions) -> Self {
        Self {
            path: path.into(),
            options,
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Modification time of the file on disk
    pub fn last_modified(&self) -> Result<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| self.error("Cannot read modification time", e))
    }

    fn open(&self) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        if self.options.truncate {
            options.truncate(true);
        } else {
            options.append(self.options.append);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.options.mode);
        }

        options
            .open(&self.path)
            .map_err(|e| self.error("Failed to open", e))
    }

    fn error(&self, message: &str, source: std::io::Error) -> LoggerError {
        LoggerError::file_writer(self.path.display().to_string(), message, source)
    }
}

impl Writer for FileWriter {
    fn write(&self, _level: Level, _module: &str, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        let mut guard = self.file.lock();
        if guard.is_none() {
            *guard = Some(self.open()?);
        }

        match guard.as_mut() {
            Some(file) => file
                .write_all(line.as_bytes())
                .map_err(|e| self.error("Failed to write", e)),
            None => Err(LoggerError::other("file handle missing after open")),
        }
    }

    fn reopen(&self) -> Result<()> {
        self.close()
    }

    fn close(&self) -> Result<()> {
        match self.file.lock().take() {
            Some(file) => file.sync_all().map_err(|e| self.error("Failed to sync", e)),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] {}", e);
        }
    }
}
