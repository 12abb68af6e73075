//! On-disk snapshot format for window descriptors.
//!
//! One file per window, named after the window. The content is exactly
//! five lines with no trailing newline:
//!
//! ```text
//! /usr/bin/editor
//! 10
//! 20
//! 1280
//! 720
//! ```
//!
//! Line 1 is the owning executable, lines 2-5 are x, y, width and
//! height. Widths and heights are non-negative. The window name is not
//! stored in the file; it is recovered from the file name.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{ErrType, Error, Level};
use crate::window::WindowDesc;

/// Failure while writing or reading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The caller passed an empty path.
    #[error("snapshot path is empty")]
    EmptyPath,

    /// File I/O failed.
    #[error("failed to {operation} snapshot file {path}")]
    Io {
        operation: &'static str,
        path: std::path::PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file does not follow the five-line format.
    #[error("malformed snapshot file {path}: {reason}")]
    InvalidFormat {
        path: std::path::PathBuf,
        reason: String,
    },
}

impl From<SnapshotError> for Error {
    fn from(err: SnapshotError) -> Self {
        let message = err.to_string();
        match &err {
            SnapshotError::EmptyPath => {
                Error::new(Level::Error, ErrType::InvalidInput, 0, message)
            }
            SnapshotError::Io { source, .. } => {
                let (level, kind) = match source.kind() {
                    io::ErrorKind::PermissionDenied => (Level::Error, ErrType::AccessDenied),
                    io::ErrorKind::NotFound => (Level::Error, ErrType::FileNotFound),
                    io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
                        (Level::Fatal, ErrType::DiskFull)
                    }
                    io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                        (Level::Error, ErrType::CorruptedData)
                    }
                    _ => (Level::Error, ErrType::Io),
                };
                Error::new(level, kind, 0, message)
            }
            SnapshotError::InvalidFormat { .. } => {
                Error::new(Level::Error, ErrType::InvalidFormat, 0, message)
            }
        }
    }
}

impl WindowDesc {
    /// Write this descriptor to `path` in the five-line format.
    ///
    /// The write is atomic: content goes to a sibling temp file which
    /// is then renamed over the target, so a crash never leaves a
    /// half-written snapshot behind.
    pub fn save_to(&self, path: &Path) -> std::result::Result<(), SnapshotError> {
        if path.as_os_str().is_empty() {
            return Err(SnapshotError::EmptyPath);
        }

        let content = format!(
            "{}\n{}\n{}\n{}\n{}",
            self.exec_path.display(),
            self.x,
            self.y,
            self.w,
            self.h
        );

        let file_name = path
            .file_name()
            .ok_or(SnapshotError::EmptyPath)?
            .to_string_lossy();
        let temp_path = path.with_file_name(format!("{file_name}.tmp"));

        let mut file = File::create(&temp_path).map_err(|e| SnapshotError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| SnapshotError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| SnapshotError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, path).map_err(|e| SnapshotError::Io {
            operation: "rename",
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!("saved window `{}` to {}", self.name, path.display());
        Ok(())
    }

    /// Read a descriptor back from a snapshot file.
    ///
    /// The window name is taken from the file name.
    pub fn load_from(path: &Path) -> std::result::Result<WindowDesc, SnapshotError> {
        if path.as_os_str().is_empty() {
            return Err(SnapshotError::EmptyPath);
        }

        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;

        let lines: Vec<&str> = content.lines().collect();
        if lines.len() != 5 {
            return Err(SnapshotError::InvalidFormat {
                path: path.to_path_buf(),
                reason: format!("expected 5 lines, found {}", lines.len()),
            });
        }

        let exec_path = lines[0];
        if exec_path.is_empty() {
            return Err(SnapshotError::InvalidFormat {
                path: path.to_path_buf(),
                reason: "executable path line is empty".to_owned(),
            });
        }

        let x = parse_field::<i32>(path, lines[1], "x")?;
        let y = parse_field::<i32>(path, lines[2], "y")?;
        let w = parse_field::<u32>(path, lines[3], "width")?;
        let h = parse_field::<u32>(path, lines[4], "height")?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(WindowDesc::new(name, x, y, w, h, exec_path))
    }
}

fn parse_field<T: std::str::FromStr>(
    path: &Path,
    line: &str,
    field: &str,
) -> std::result::Result<T, SnapshotError> {
    line.trim()
        .parse()
        .map_err(|_| SnapshotError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("{field} is not a valid number: `{line}`"),
        })
}
