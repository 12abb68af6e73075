//! X11 backend.
//!
//! Talks to the X server over the EWMH surface: top-level windows come
//! from `_NET_CLIENT_LIST` on the root window, the owning executable
//! is resolved through `_NET_WM_PID` and `/proc/<pid>/exe`, polite
//! closes go through `_NET_CLOSE_WINDOW` and geometry is applied with
//! configure requests. Windows without a resolvable executable cannot
//! be restored and are skipped during enumeration.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use deskup_core::{ErrType, Error, Level, Result, Status, WindowDesc};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt, EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

use crate::WindowBackend;
use crate::bootstrap::default_data_dir;

struct Atoms {
    net_client_list: Atom,
    net_wm_pid: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
    net_close_window: Atom,
}

impl Atoms {
    fn intern(conn: &RustConnection) -> Result<Self> {
        let fetch = |name: &[u8]| -> Result<Atom> {
            let cookie = conn
                .intern_atom(false, name)
                .map_err(|e| proto_error("intern atom", &e))?;
            let reply = cookie.reply().map_err(|e| proto_error("intern atom", &e))?;
            Ok(reply.atom)
        };
        Ok(Self {
            net_client_list: fetch(b"_NET_CLIENT_LIST")?,
            net_wm_pid: fetch(b"_NET_WM_PID")?,
            net_wm_name: fetch(b"_NET_WM_NAME")?,
            utf8_string: fetch(b"UTF8_STRING")?,
            net_close_window: fetch(b"_NET_CLOSE_WINDOW")?,
        })
    }
}

/// Backend driving a live X11 display.
pub struct X11Backend {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl X11Backend {
    /// Whether an X display can be opened on this system.
    pub fn is_available() -> bool {
        RustConnection::connect(None).is_ok()
    }

    /// Open the display and intern the atoms the backend needs.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None).map_err(|e| {
            Error::new(
                Level::Fatal,
                ErrType::DeviceNotFound,
                0,
                format!("cannot open X display: {e}"),
            )
        })?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = Atoms::intern(&conn)?;
        Ok(Self { conn, root, atoms })
    }

    fn client_list(&self) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .get_property(
                false,
                self.root,
                self.atoms.net_client_list,
                AtomEnum::WINDOW,
                0,
                u32::MAX,
            )
            .map_err(|e| proto_error("query client list", &e))?
            .reply()
            .map_err(|e| proto_error("query client list", &e))?;
        Ok(reply
            .value32()
            .map(|values| values.collect())
            .unwrap_or_default())
    }

    fn window_exec_path(&self, window: Window) -> Option<PathBuf> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atoms.net_wm_pid,
                AtomEnum::CARDINAL,
                0,
                1,
            )
            .ok()?
            .reply()
            .ok()?;
        let pid = reply.value32()?.next()?;
        fs::read_link(format!("/proc/{pid}/exe")).ok()
    }

    fn window_name(&self, window: Window) -> String {
        let fetch = |property: Atom, type_: Atom| -> Option<String> {
            let reply = self
                .conn
                .get_property(false, window, property, type_, 0, u32::MAX)
                .ok()?
                .reply()
                .ok()?;
            if reply.value.is_empty() {
                return None;
            }
            Some(String::from_utf8_lossy(&reply.value).into_owned())
        };
        fetch(self.atoms.net_wm_name, self.atoms.utf8_string)
            .or_else(|| fetch(AtomEnum::WM_NAME.into(), AtomEnum::STRING.into()))
            .unwrap_or_else(|| "unnamed".to_owned())
    }

    fn window_geometry(&self, window: Window) -> Result<(i32, i32, u32, u32)> {
        let geometry = self
            .conn
            .get_geometry(window)
            .map_err(|e| proto_error("query window geometry", &e))?
            .reply()
            .map_err(|e| proto_error("query window geometry", &e))?;
        let translated = self
            .conn
            .translate_coordinates(window, self.root, 0, 0)
            .map_err(|e| proto_error("translate window coordinates", &e))?
            .reply()
            .map_err(|e| proto_error("translate window coordinates", &e))?;
        Ok((
            i32::from(translated.dst_x),
            i32::from(translated.dst_y),
            u32::from(geometry.width),
            u32::from(geometry.height),
        ))
    }

    fn windows_of_exec(&self, exec_path: &Path) -> Result<Vec<Window>> {
        Ok(self
            .client_list()?
            .into_iter()
            .filter(|&w| self.window_exec_path(w).as_deref() == Some(exec_path))
            .collect())
    }
}

impl WindowBackend for X11Backend {
    fn name(&self) -> &str {
        "x11"
    }

    fn enumerate_windows(&self) -> Result<Vec<WindowDesc>> {
        let mut windows = Vec::new();
        for window in self.client_list()? {
            let Some(exec_path) = self.window_exec_path(window) else {
                debug!("skipping window {window:#x}: no resolvable executable");
                continue;
            };
            let (x, y, w, h) = self.window_geometry(window)?;
            let name = self.window_name(window);
            windows.push(WindowDesc::new(name, x, y, w, h, exec_path));
        }
        Ok(windows)
    }

    fn launch(&self, exec_path: &Path) -> Status {
        Command::new(exec_path)
            .spawn()
            .map(|_| ())
            .map_err(|e| Error::from_os_error(&e, "launch", 0))
    }

    fn close_process(&self, exec_path: &Path, force: bool) -> Status {
        for window in self.windows_of_exec(exec_path)? {
            if force {
                self.conn
                    .kill_client(window)
                    .map_err(|e| proto_error("kill client", &e))?;
            } else {
                let event = ClientMessageEvent::new(
                    32,
                    window,
                    self.atoms.net_close_window,
                    [0, 0, 0, 0, 0],
                );
                self.conn
                    .send_event(
                        false,
                        self.root,
                        EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                        event,
                    )
                    .map_err(|e| proto_error("request window close", &e))?;
            }
        }
        self.conn
            .flush()
            .map_err(|e| proto_error("flush close requests", &e))?;
        Ok(())
    }

    fn resize_window(&self, window: &WindowDesc) -> Status {
        let candidates = self.windows_of_exec(&window.exec_path)?;
        let Some(&target) = candidates.first() else {
            return Err(Error::new(
                Level::Retry,
                ErrType::NotFound,
                0,
                format!("no window found for {}", window.exec_path.display()),
            ));
        };
        let aux = ConfigureWindowAux::new()
            .x(window.x)
            .y(window.y)
            .width(window.w)
            .height(window.h);
        self.conn
            .configure_window(target, &aux)
            .map_err(|e| proto_error("configure window", &e))?;
        self.conn
            .flush()
            .map_err(|e| proto_error("flush configure request", &e))?;
        Ok(())
    }

    fn data_dir(&self) -> Result<PathBuf> {
        default_data_dir()
    }
}

fn proto_error(context: &str, err: &dyn std::fmt::Display) -> Error {
    Error::new(
        Level::Error,
        ErrType::ProtocolError,
        0,
        format!("{context}: {err}"),
    )
}
