//! In-memory backend.
//!
//! Keeps a seeded window list behind a mutex and records every
//! launch/close/resize call in an event log. Serves as the fallback
//! device on systems without a display server, and as the test double
//! for the persistence layer: tests seed windows, optionally inject an
//! error, and assert on the recorded events afterwards.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use deskup_core::{Error, Result, Status, WindowDesc};

use crate::WindowBackend;
use crate::bootstrap::default_data_dir;

/// One recorded backend operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendEvent {
    /// `launch` was called for the executable.
    Launched(PathBuf),
    /// `close_process` was called for the executable.
    Closed { exec_path: PathBuf, force: bool },
    /// `resize_window` was called with the descriptor.
    Resized(WindowDesc),
}

#[derive(Default)]
struct State {
    windows: Vec<WindowDesc>,
    fail_with: Option<Error>,
    events: Vec<BackendEvent>,
}

/// Always-available backend holding its window list in memory.
#[derive(Default)]
pub struct HeadlessBackend {
    state: Mutex<State>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with an initial window list.
    pub fn with_windows(windows: Vec<WindowDesc>) -> Self {
        let backend = Self::new();
        backend.seed(windows);
        backend
    }

    /// Replace the window list.
    pub fn seed(&self, windows: Vec<WindowDesc>) {
        self.lock().windows = windows;
    }

    /// Make every subsequent operation fail with `err`.
    pub fn fail_with(&self, err: Error) {
        self.lock().fail_with = Some(err);
    }

    /// Stop failing operations.
    pub fn clear_failure(&self) {
        self.lock().fail_with = None;
    }

    /// The operations recorded so far, in call order.
    pub fn events(&self) -> Vec<BackendEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(&self) -> Status {
        match &self.lock().fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl WindowBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn enumerate_windows(&self) -> Result<Vec<WindowDesc>> {
        self.check_failure()?;
        Ok(self.lock().windows.clone())
    }

    fn launch(&self, exec_path: &Path) -> Status {
        self.check_failure()?;
        self.lock()
            .events
            .push(BackendEvent::Launched(exec_path.to_path_buf()));
        Ok(())
    }

    fn close_process(&self, exec_path: &Path, force: bool) -> Status {
        self.check_failure()?;
        self.lock().events.push(BackendEvent::Closed {
            exec_path: exec_path.to_path_buf(),
            force,
        });
        Ok(())
    }

    fn resize_window(&self, window: &WindowDesc) -> Status {
        self.check_failure()?;
        self.lock()
            .events
            .push(BackendEvent::Resized(window.clone()));
        Ok(())
    }

    fn data_dir(&self) -> Result<PathBuf> {
        default_data_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskup_core::{ErrType, Level};

    fn sample_windows() -> Vec<WindowDesc> {
        vec![
            WindowDesc::new("Alpha", 10, 20, 300, 200, "/usr/bin/alpha"),
            WindowDesc::new("Beta", 30, 40, 500, 400, "/usr/bin/beta"),
        ]
    }

    #[test]
    fn enumerates_seeded_windows() {
        let backend = HeadlessBackend::with_windows(sample_windows());
        let windows = backend.enumerate_windows().unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].name, "Alpha");
    }

    #[test]
    fn injected_error_is_returned_by_every_operation() {
        let backend = HeadlessBackend::with_windows(sample_windows());
        backend.fail_with(Error::new(
            Level::Fatal,
            ErrType::AccessDenied,
            0,
            "injected",
        ));

        let err = backend.enumerate_windows().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.kind(), ErrType::AccessDenied);
        assert!(backend.launch(Path::new("/usr/bin/alpha")).is_err());

        backend.clear_failure();
        assert!(backend.enumerate_windows().is_ok());
    }

    #[test]
    fn operations_are_recorded_in_order() {
        let backend = HeadlessBackend::new();
        let window = WindowDesc::new("Alpha", 10, 20, 300, 200, "/usr/bin/alpha");

        backend
            .close_process(Path::new("/usr/bin/alpha"), true)
            .unwrap();
        backend.launch(Path::new("/usr/bin/alpha")).unwrap();
        backend.resize_window(&window).unwrap();

        assert_eq!(
            backend.events(),
            vec![
                BackendEvent::Closed {
                    exec_path: "/usr/bin/alpha".into(),
                    force: true,
                },
                BackendEvent::Launched("/usr/bin/alpha".into()),
                BackendEvent::Resized(window),
            ]
        );
    }
}
