//! Window descriptor model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything needed to restore a window to its original state:
/// its on-screen geometry and the executable that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDesc {
    /// Window title, used to name the snapshot file.
    pub name: String,
    /// Horizontal position of the top-left corner.
    pub x: i32,
    /// Vertical position of the top-left corner.
    pub y: i32,
    /// Window width in pixels.
    pub w: u32,
    /// Window height in pixels.
    pub h: u32,
    /// Path to the executable that owns the window.
    pub exec_path: PathBuf,
}

impl WindowDesc {
    /// Construct a descriptor from its parts.
    pub fn new(
        name: impl Into<String>,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        exec_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            w,
            h,
            exec_path: exec_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let window = WindowDesc::new("Editor", -5, 40, 1280, 720, "/usr/bin/editor");
        let json = serde_json::to_string(&window).unwrap();
        let restored: WindowDesc = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, window);
    }
}
