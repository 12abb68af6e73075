//! Unified error representation for DeskUp.
//!
//! Every subsystem (snapshot I/O, the platform backends, workspace
//! persistence, the CLI) reports failures through a single [`Error`]
//! type carrying a severity [`Level`], a category [`ErrType`], the
//! number of attempts performed before giving up, and an optional
//! descriptor of the window the failure relates to.
//!
//! Severity drives propagation: `Fatal` stops the current operation
//! immediately, while `Retry`, `Skip` and `Warning` let multi-window
//! operations continue past individual failures.

use std::io;

use crate::window::WindowDesc;

/// Severity of an error, classifying its impact and intended handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Level {
    /// Unrecoverable; the whole operation must stop.
    Fatal,
    /// Serious failure; the operation was aborted.
    Error,
    /// Non-critical issue; user notification recommended.
    Warning,
    /// Recoverable failure that may succeed upon retry.
    Retry,
    /// Per-item failure; skip the item and continue.
    Skip,
    /// Informational, not an error.
    Info,
    /// Debug-only diagnostic.
    Debug,
    /// Unspecified severity.
    Default,
    /// Absence of error.
    #[default]
    None,
}

/// Category or origin of an error.
///
/// Each variant identifies a distinct class of failures so that
/// platform and library errors can be mapped into portable internal
/// types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrType {
    /// Memory allocation failed or the system is out of resources.
    InsufficientMemory,
    /// Permission denied by the OS or file system.
    AccessDenied,
    /// Another process holds an exclusive lock.
    SharingViolation,
    /// Generic input/output error.
    Io,
    /// Resource not found.
    NotFound,
    /// Storage volume full.
    DiskFull,
    /// Device unavailable or disconnected.
    DeviceNotFound,
    /// Operation timed out.
    Timeout,
    /// Resource is in use.
    ResourceBusy,
    /// File could not be located.
    FileNotFound,
    /// Invalid file or data format.
    InvalidFormat,
    /// Invalid parameter passed by the caller.
    InvalidInput,
    /// Data corruption detected.
    CorruptedData,
    /// Index or parameter out of valid range.
    OutOfRange,
    /// Generic network failure.
    NetworkError,
    /// Connection attempt refused.
    ConnectionRefused,
    /// Target host cannot be reached.
    HostUnreachable,
    /// Violation of expected protocol behavior.
    ProtocolError,
    /// Unexpected runtime condition.
    Unexpected,
    /// Feature not yet implemented.
    NotImplemented,
    /// A system policy changed underneath the operation.
    PolicyUpdated,
    /// A platform call failed without a more specific cause.
    FunctionFailed,
    /// Unspecified error type.
    Default,
    /// Represents no error.
    #[default]
    None,
}

/// Structured representation of a DeskUp runtime error.
///
/// The default value is the non-error sentinel
/// ([`Level::None`]/[`ErrType::None`] with an empty message); it must
/// never travel through a failed [`Result`].
#[derive(Clone, Debug, Default, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    level: Level,
    kind: ErrType,
    attempts: u32,
    message: String,
    affected_window: Option<WindowDesc>,
}

/// Result of an operation that yields a value or a DeskUp [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Result of an operation that yields nothing on success.
pub type Status = Result<()>;

impl Error {
    /// Construct an error with full metadata.
    pub fn new(level: Level, kind: ErrType, attempts: u32, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            attempts,
            message: message.into(),
            affected_window: None,
        }
    }

    /// Attach the window the failure relates to.
    #[must_use]
    pub fn with_window(mut self, window: WindowDesc) -> Self {
        self.affected_window = Some(window);
        self
    }

    /// The error category.
    pub fn kind(&self) -> ErrType {
        self.kind
    }

    /// The error severity.
    pub fn level(&self) -> Level {
        self.level
    }

    /// How many times the operation was attempted before failing.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The descriptive message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The affected window, if one was recorded.
    pub fn affected_window(&self) -> Option<&WindowDesc> {
        self.affected_window.as_ref()
    }

    /// Whether the error is fatal.
    pub fn is_fatal(&self) -> bool {
        self.level == Level::Fatal
    }

    /// Whether the operation may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        self.level == Level::Retry
    }

    /// Whether the failing item should be skipped.
    pub fn is_skippable(&self) -> bool {
        self.level == Level::Skip
    }

    /// Whether this is a non-critical warning.
    pub fn is_warning(&self) -> bool {
        self.level == Level::Warning
    }

    /// Whether this is an ordinary (aborting, non-fatal) error.
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    /// Whether this value is the non-error sentinel.
    pub fn is_none(&self) -> bool {
        self.level == Level::None
    }

    /// Build an error from an OS-level I/O failure.
    ///
    /// Maps the platform error kind into a portable severity/category
    /// pair: permission problems and exhausted memory or disk space
    /// are fatal, lock conflicts and transient device failures are
    /// retryable, and bad or missing paths are skippable so that
    /// multi-window operations can move on to the next item.
    pub fn from_os_error(err: &io::Error, context: &str, attempts: u32) -> Self {
        let (level, kind) = classify_os_error(err.kind());
        let message = if context.is_empty() {
            err.to_string()
        } else {
            format!("{context}: {err}")
        };
        Self::new(level, kind, attempts, message)
    }

    /// Title for user-facing presentation, chosen by severity.
    pub fn title(&self) -> &'static str {
        match self.level {
            Level::Fatal => "Critical Error",
            Level::Error => "Error",
            Level::Warning => "Warning",
            Level::Info => "Information",
            Level::Retry => "Retry",
            _ => "DeskUp",
        }
    }

    /// A user-friendly message for this error, chosen by category.
    ///
    /// Falls back to the raw message for categories without a fixed
    /// phrasing.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrType::AccessDenied => {
                "You do not have permission to perform this operation.".to_owned()
            }
            ErrType::FileNotFound => {
                "The specified file or directory could not be found.".to_owned()
            }
            ErrType::DiskFull => {
                "There is not enough disk space to complete the operation.".to_owned()
            }
            ErrType::InvalidInput => "One or more provided parameters are invalid.".to_owned(),
            ErrType::InvalidFormat => {
                "A saved window file is malformed and could not be read.".to_owned()
            }
            ErrType::Io => {
                "An input/output error occurred while accessing the filesystem.".to_owned()
            }
            ErrType::InsufficientMemory => "The system ran out of memory.".to_owned(),
            ErrType::DeviceNotFound => {
                "No window backend is available on this system.".to_owned()
            }
            ErrType::Timeout => "The operation timed out and was cancelled.".to_owned(),
            ErrType::Unexpected => "An unexpected error occurred.".to_owned(),
            _ => self.message.clone(),
        }
    }

    /// A suggestion for how to resolve this error, when one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind {
            ErrType::AccessDenied => {
                Some("Restart DeskUp with sufficient permissions and try again.")
            }
            ErrType::DiskFull | ErrType::InsufficientMemory => {
                Some("Free up space on your device and try again.")
            }
            ErrType::FileNotFound => {
                Some("Check that the workspace still exists and has not been moved.")
            }
            ErrType::InvalidFormat | ErrType::CorruptedData => {
                Some("Delete the workspace and save it again.")
            }
            ErrType::DeviceNotFound => {
                Some("DeskUp needs a running display server to enumerate windows.")
            }
            ErrType::SharingViolation | ErrType::ResourceBusy => {
                Some("Another program is using the resource. Try again later.")
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::from_os_error(&err, "", 0)
    }
}

fn classify_os_error(kind: io::ErrorKind) -> (Level, ErrType) {
    match kind {
        io::ErrorKind::PermissionDenied => (Level::Fatal, ErrType::AccessDenied),
        io::ErrorKind::OutOfMemory => (Level::Fatal, ErrType::InsufficientMemory),
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
            (Level::Fatal, ErrType::DiskFull)
        }
        io::ErrorKind::WouldBlock => (Level::Retry, ErrType::SharingViolation),
        io::ErrorKind::ResourceBusy | io::ErrorKind::ExecutableFileBusy => {
            (Level::Retry, ErrType::ResourceBusy)
        }
        io::ErrorKind::TimedOut => (Level::Retry, ErrType::Timeout),
        io::ErrorKind::Interrupted | io::ErrorKind::BrokenPipe => (Level::Retry, ErrType::Io),
        io::ErrorKind::InvalidInput => (Level::Skip, ErrType::InvalidInput),
        io::ErrorKind::NotFound => (Level::Skip, ErrType::FileNotFound),
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            (Level::Error, ErrType::CorruptedData)
        }
        io::ErrorKind::ConnectionRefused => (Level::Error, ErrType::ConnectionRefused),
        io::ErrorKind::HostUnreachable => (Level::Error, ErrType::HostUnreachable),
        io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::NetworkDown
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => (Level::Error, ErrType::NetworkError),
        io::ErrorKind::Unsupported => (Level::Error, ErrType::NotImplemented),
        _ => (Level::Default, ErrType::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_preserved() {
        let levels = [
            Level::Fatal,
            Level::Error,
            Level::Warning,
            Level::Retry,
            Level::Skip,
            Level::Info,
            Level::Debug,
            Level::Default,
            Level::None,
        ];
        for level in levels {
            let err = Error::new(level, ErrType::None, 0, "");
            assert_eq!(err.level(), level);
        }
    }

    #[test]
    fn predicates_match_level() {
        assert!(Error::new(Level::Fatal, ErrType::Default, 0, "x").is_fatal());
        assert!(Error::new(Level::Retry, ErrType::Default, 0, "x").is_retryable());
        assert!(Error::new(Level::Skip, ErrType::Default, 0, "x").is_skippable());
        assert!(Error::new(Level::Warning, ErrType::Default, 0, "x").is_warning());
        assert!(Error::new(Level::Error, ErrType::Default, 0, "x").is_error());
        assert!(Error::default().is_none());
    }

    #[test]
    fn default_is_the_non_error_sentinel() {
        let err = Error::default();
        assert_eq!(err.level(), Level::None);
        assert_eq!(err.kind(), ErrType::None);
        assert_eq!(err.attempts(), 0);
        assert!(err.message().is_empty());
        assert!(err.affected_window().is_none());
    }

    #[test]
    fn os_error_classification() {
        let cases = [
            (
                io::ErrorKind::PermissionDenied,
                Level::Fatal,
                ErrType::AccessDenied,
            ),
            (
                io::ErrorKind::OutOfMemory,
                Level::Fatal,
                ErrType::InsufficientMemory,
            ),
            (io::ErrorKind::StorageFull, Level::Fatal, ErrType::DiskFull),
            (
                io::ErrorKind::WouldBlock,
                Level::Retry,
                ErrType::SharingViolation,
            ),
            (io::ErrorKind::TimedOut, Level::Retry, ErrType::Timeout),
            (
                io::ErrorKind::InvalidInput,
                Level::Skip,
                ErrType::InvalidInput,
            ),
            (io::ErrorKind::NotFound, Level::Skip, ErrType::FileNotFound),
            (
                io::ErrorKind::ConnectionRefused,
                Level::Error,
                ErrType::ConnectionRefused,
            ),
            (
                io::ErrorKind::Unsupported,
                Level::Error,
                ErrType::NotImplemented,
            ),
            (io::ErrorKind::Other, Level::Default, ErrType::Default),
        ];
        for (kind, level, err_type) in cases {
            let err = Error::from_os_error(&io::Error::from(kind), "op", 2);
            assert_eq!(err.level(), level, "{kind:?}");
            assert_eq!(err.kind(), err_type, "{kind:?}");
            assert_eq!(err.attempts(), 2);
        }
    }

    #[test]
    fn os_error_message_includes_context() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::from_os_error(&io_err, "open snapshot", 0);
        assert!(err.message().starts_with("open snapshot: "));
        assert!(err.message().contains("gone"));
    }

    #[test]
    fn titles_follow_severity() {
        assert_eq!(
            Error::new(Level::Fatal, ErrType::Io, 0, "").title(),
            "Critical Error"
        );
        assert_eq!(Error::new(Level::Retry, ErrType::Io, 0, "").title(), "Retry");
        assert_eq!(Error::default().title(), "DeskUp");
    }

    #[test]
    fn user_message_falls_back_to_raw_message() {
        let err = Error::new(Level::Error, ErrType::ProtocolError, 0, "raw detail");
        assert_eq!(err.user_message(), "raw detail");
        let err = Error::new(Level::Error, ErrType::AccessDenied, 0, "raw detail");
        assert_eq!(
            err.user_message(),
            "You do not have permission to perform this operation."
        );
    }

    #[test]
    fn attached_window_is_reported() {
        let window = WindowDesc::new("editor", 10, 20, 300, 200, "/usr/bin/editor");
        let err = Error::new(Level::Skip, ErrType::Io, 0, "save failed").with_window(window);
        assert_eq!(err.affected_window().unwrap().name, "editor");
    }
}
