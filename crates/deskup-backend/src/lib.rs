//! Pluggable window backends for DeskUp.
//!
//! A backend is the platform-specific surface DeskUp uses to talk to
//! the window system: enumerating open windows, launching and closing
//! the processes that own them, and moving windows back to a saved
//! geometry. Backends register through a [`Bootstrap`] entry; [`init`]
//! walks the registration order and connects the first backend that
//! reports itself available on this system.
//!
//! The [`HeadlessBackend`] is always available. It keeps its window
//! list in memory and records every operation, which makes it both the
//! fallback device on systems without a display server and the test
//! double for the higher layers.

use std::path::{Path, PathBuf};

use deskup_core::{Result, Status, WindowDesc};

mod bootstrap;
mod headless;
#[cfg(all(target_os = "linux", feature = "x11"))]
mod x11;

pub use bootstrap::{Bootstrap, Device, builtin, init, init_named};
pub use headless::{BackendEvent, HeadlessBackend};
#[cfg(all(target_os = "linux", feature = "x11"))]
pub use x11::X11Backend;

/// Platform-specific window operations.
///
/// All methods report failures through the DeskUp error taxonomy so
/// callers can decide, per severity, whether to abort, retry or skip.
pub trait WindowBackend: Send + Sync {
    /// Backend name, matching its [`Bootstrap`] entry.
    fn name(&self) -> &str;

    /// Enumerate all windows currently open on the desktop.
    fn enumerate_windows(&self) -> Result<Vec<WindowDesc>>;

    /// Launch the executable at `exec_path`.
    fn launch(&self, exec_path: &Path) -> Status;

    /// Close running instances of the executable at `exec_path`.
    ///
    /// With `force` set, instances that do not respond to a polite
    /// close request are terminated.
    fn close_process(&self, exec_path: &Path, force: bool) -> Status;

    /// Move and resize the window described by `window` to its stored
    /// geometry.
    fn resize_window(&self, window: &WindowDesc) -> Status;

    /// Base directory under which this backend stores saved
    /// workspaces.
    fn data_dir(&self) -> Result<PathBuf>;
}
