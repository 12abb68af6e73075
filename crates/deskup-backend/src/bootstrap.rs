//! Backend registration and selection.
//!
//! Each backend contributes a [`Bootstrap`] entry: a name, an
//! availability probe and a constructor. [`init`] walks the entries in
//! registration order, skips the ones that are not available on this
//! system, and connects the first one that is. The headless backend is
//! registered last and is always available, so initialization only
//! fails when a backend cannot resolve its data directory.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use deskup_core::{ErrType, Error, Level, Result};
use tracing::{debug, info};

use crate::WindowBackend;
use crate::headless::HeadlessBackend;

/// Registration entry for one backend.
pub struct Bootstrap {
    /// Backend name, usable with [`init_named`] and `--backend`.
    pub name: &'static str,
    /// Whether the backend can run on this system.
    pub is_available: fn() -> bool,
    /// Construct the backend device.
    pub create: fn() -> Result<Box<dyn WindowBackend>>,
}

/// A connected backend together with its resolved data directory.
pub struct Device {
    backend: Box<dyn WindowBackend>,
    data_dir: PathBuf,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("backend", &self.backend.name())
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Device {
    /// The active backend.
    pub fn backend(&self) -> &dyn WindowBackend {
        self.backend.as_ref()
    }

    /// Base directory for saved workspaces.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// The built-in backends, in selection order.
pub fn builtin() -> Vec<Bootstrap> {
    let mut entries = Vec::new();

    #[cfg(all(target_os = "linux", feature = "x11"))]
    entries.push(Bootstrap {
        name: "x11",
        is_available: crate::x11::X11Backend::is_available,
        create: || crate::x11::X11Backend::connect().map(|b| Box::new(b) as Box<dyn WindowBackend>),
    });

    entries.push(Bootstrap {
        name: "headless",
        is_available: || true,
        create: || Ok(Box::new(HeadlessBackend::new()) as Box<dyn WindowBackend>),
    });

    entries
}

/// Connect the first available backend.
pub fn init() -> Result<Device> {
    for entry in builtin() {
        if !(entry.is_available)() {
            info!("{} is not an available backend on this system", entry.name);
            continue;
        }
        return connect(&entry);
    }

    Err(Error::new(
        Level::Fatal,
        ErrType::DeviceNotFound,
        0,
        "no window backend is available on this system",
    ))
}

/// Connect a backend by its bootstrap name.
pub fn init_named(name: &str) -> Result<Device> {
    for entry in builtin() {
        if entry.name != name {
            continue;
        }
        if !(entry.is_available)() {
            return Err(Error::new(
                Level::Fatal,
                ErrType::DeviceNotFound,
                0,
                format!("backend `{name}` is not available on this system"),
            ));
        }
        return connect(&entry);
    }

    Err(Error::new(
        Level::Error,
        ErrType::InvalidInput,
        0,
        format!("unknown backend `{name}`"),
    ))
}

fn connect(entry: &Bootstrap) -> Result<Device> {
    let backend = (entry.create)()?;
    let data_dir = backend.data_dir()?;
    info!("DeskUp path: {}", data_dir.display());
    info!("{} successfully connected as a backend", entry.name);
    Ok(Device { backend, data_dir })
}

/// Resolve the default base directory for saved workspaces.
///
/// `DESKUP_DIR` overrides everything; otherwise the directory is
/// `.deskup` under the user's home directory.
pub(crate) fn default_data_dir() -> Result<PathBuf> {
    let override_dir = env::var_os("DESKUP_DIR");
    let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"));
    data_dir_from(override_dir, home)
}

fn data_dir_from(override_dir: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        debug!("using DESKUP_DIR override");
        return Ok(PathBuf::from(dir));
    }
    match home {
        Some(home) => Ok(PathBuf::from(home).join(".deskup")),
        None => Err(Error::new(
            Level::Fatal,
            ErrType::NotFound,
            0,
            "cannot resolve the DeskUp data directory: no home directory",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_always_finds_a_backend() {
        let device = init().unwrap();
        assert!(!device.backend().name().is_empty());
    }

    #[test]
    fn init_named_headless() {
        let device = init_named("headless").unwrap();
        assert_eq!(device.backend().name(), "headless");
    }

    #[test]
    fn init_named_rejects_unknown_backend() {
        let err = init_named("wayland").unwrap_err();
        assert_eq!(err.kind(), ErrType::InvalidInput);
    }

    #[test]
    fn override_dir_wins() {
        let dir = data_dir_from(Some("/tmp/deskup-test".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/deskup-test"));
    }

    #[test]
    fn home_fallback_appends_dot_deskup() {
        let dir = data_dir_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.deskup"));
    }

    #[test]
    fn missing_home_is_fatal() {
        let err = data_dir_from(None, None).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.kind(), ErrType::NotFound);
    }
}
