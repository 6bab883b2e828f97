//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File writer error with path
    #[error("File writer error for '{path}': {message}")]
    FileWriterError {
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Syslog connection or delivery error
    #[error("Syslog error ({address}): {message}")]
    SyslogError { address: String, message: String },

    /// Several writers of a stack failed for the same record
    #[error("{} writers failed: {}", errors.len(), join_errors(errors))]
    Stack { errors: Vec<LoggerError> },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn join_errors(errors: &[LoggerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file writer error
    pub fn file_writer(
        path: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a syslog error
    pub fn syslog(address: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SyslogError {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Collapse a list of writer failures into one error.
    ///
    /// Returns `None` for an empty list and the error itself when only one
    /// writer failed.
    pub fn from_many(mut errors: Vec<LoggerError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(LoggerError::Stack { errors }),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = LoggerError::file_writer("/var/log/app.log", "Failed to open", io_err);
        assert!(matches!(err, LoggerError::FileWriterError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::syslog("udp://127.0.0.1:514", "connection refused");
        assert_eq!(
            err.to_string(),
            "Syslog error (udp://127.0.0.1:514): connection refused"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }

    #[test]
    fn test_from_many() {
        assert!(LoggerError::from_many(Vec::new()).is_none());

        let single = LoggerError::from_many(vec![LoggerError::other("a")]).unwrap();
        assert!(matches!(single, LoggerError::Other(_)));

        let stacked =
            LoggerError::from_many(vec![LoggerError::other("a"), LoggerError::other("b")])
                .unwrap();
        assert_eq!(stacked.to_string(), "2 writers failed: a; b");
    }
}
