//! Save and restore flows.
//!
//! Both flows orchestrate the active window backend against the
//! workspace directory layout, honoring the severity rules of the
//! error taxonomy: a fatal error aborts the whole flow immediately,
//! anything milder is logged and the flow moves on to the next window.

use std::path::PathBuf;

use deskup_backend::WindowBackend;
use deskup_core::{ErrType, Error, Level, Status, WindowDesc};
use tracing::{info, warn};

use crate::workspace::WorkspaceStore;

/// Snapshot every currently open window into the named workspace.
///
/// The workspace directory is created if needed. Windows sharing a
/// name get distinct snapshot files by appending an incrementing id.
/// An enumeration failure or a fatal save error (disk full) aborts;
/// any other save error skips the window, and the last one is reported
/// after the loop so the caller knows the save was incomplete.
pub fn save_workspace(
    store: &WorkspaceStore,
    backend: &dyn WindowBackend,
    name: &str,
) -> Status {
    if !WorkspaceStore::valid_name(name) {
        return Err(Error::new(
            Level::Error,
            ErrType::InvalidInput,
            0,
            format!("invalid workspace name `{name}`"),
        ));
    }

    let dir = store.ensure_dir(name)?;
    let windows = backend.enumerate_windows()?;

    let mut last_err: Option<Error> = None;
    // Windows of the same application often share a title. One counter
    // across the whole loop, matching the saved-file naming scheme.
    let mut id: u32 = 0;

    for window in &windows {
        let mut path = dir.join(&window.name);
        while path.exists() {
            path = dir.join(format!("{}{}", window.name, id));
            id += 1;
        }

        if let Err(save_err) = window.save_to(&path) {
            let err = Error::from(save_err).with_window(window.clone());
            if err.is_fatal() {
                return Err(err);
            }
            warn!("skipped window `{}`: {err}", window.name);
            last_err = Some(err);
        }
    }

    info!(
        "saved {} window(s) into workspace `{name}`",
        windows.len()
    );
    match last_err {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

/// Bring every window saved in the named workspace back.
///
/// For each snapshot file: parse it, close running instances of the
/// saved executable, launch it again and move its window to the stored
/// geometry. A snapshot that cannot be parsed aborts the restore; a
/// non-fatal failure in close/launch/resize logs a warning and the
/// flow continues with the next step.
pub fn restore_workspace(
    store: &WorkspaceStore,
    backend: &dyn WindowBackend,
    name: &str,
) -> Status {
    let dir = store.workspace_dir(name);
    if !dir.is_dir() {
        return Err(Error::new(
            Level::Error,
            ErrType::InvalidInput,
            0,
            format!("no workspace at {}", dir.display()),
        ));
    }

    let force_termination = true;

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .map_err(|e| Error::from_os_error(&e, "read workspace directory", 0))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    for file in files {
        let window = WindowDesc::load_from(&file).map_err(Error::from)?;

        if let Err(err) = backend.close_process(&window.exec_path, force_termination) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!("unclosed window `{}`: {err}", window.name);
        }

        if let Err(err) = backend.launch(&window.exec_path) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!("unopened window `{}`: {err}", window.name);
        }

        if let Err(err) = backend.resize_window(&window) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!("unresized window `{}`: {err}", window.name);
        }
    }

    info!("restored workspace `{name}`");
    Ok(())
}
