//! Workspace directory layout and name rules.

use std::fs;
use std::path::{Path, PathBuf};

use deskup_core::{ErrType, Error, Level, Result, Status};

/// Characters that may not appear in a workspace name.
pub const NAME_BLACKLIST: &str = "\\/:?*\"<>|";

/// Directory layout for saved workspaces.
///
/// Every workspace lives at `<base_dir>/<name>`; the base directory
/// comes from the active backend's data dir.
pub struct WorkspaceStore {
    base_dir: PathBuf,
}

impl WorkspaceStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The base directory all workspaces live under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether `name` is acceptable as a workspace folder name.
    ///
    /// A name is invalid if it is empty, names the current or parent
    /// directory, or contains any character from [`NAME_BLACKLIST`].
    pub fn valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.chars().any(|c| NAME_BLACKLIST.contains(c))
    }

    /// The directory a workspace of this name would occupy.
    pub fn workspace_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Whether a workspace with this name exists on disk.
    pub fn exists(&self, name: &str) -> bool {
        !name.is_empty() && self.workspace_dir(name).is_dir()
    }

    /// Create the workspace directory if it does not exist yet and
    /// return its path.
    pub fn ensure_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.workspace_dir(name);
        if dir.is_dir() {
            return Ok(dir);
        }
        fs::create_dir_all(&dir)
            .map_err(|e| Error::from_os_error(&e, "create workspace directory", 0))?;
        Ok(dir)
    }

    /// Delete a workspace and everything in it.
    pub fn remove(&self, name: &str) -> Status {
        if !self.exists(name) {
            return Err(Error::new(
                Level::Error,
                ErrType::InvalidInput,
                0,
                format!("no workspace named `{name}`"),
            ));
        }
        fs::remove_dir_all(self.workspace_dir(name))
            .map_err(|e| Error::from_os_error(&e, "remove workspace", 0))
    }

    /// Names of all saved workspaces, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.base_dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| Error::from_os_error(&e, "read workspace base directory", 0))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::from_os_error(&e, "read workspace base directory", 0))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_name_is_invalid() {
        assert!(!WorkspaceStore::valid_name(""));
    }

    #[test]
    fn dot_names_are_invalid() {
        assert!(!WorkspaceStore::valid_name("."));
        assert!(!WorkspaceStore::valid_name(".."));
        assert!(WorkspaceStore::valid_name(".hidden"));
    }

    #[test]
    fn blacklisted_characters_are_rejected() {
        for c in NAME_BLACKLIST.chars() {
            let name = format!("work{c}space");
            assert!(!WorkspaceStore::valid_name(&name), "accepted `{name}`");
        }
    }

    #[test]
    fn ordinary_names_are_valid() {
        for name in ["coding", "two words", "mixed-1_2.3"] {
            assert!(WorkspaceStore::valid_name(name), "rejected `{name}`");
        }
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());

        let dir = store.ensure_dir("ws").unwrap();
        assert!(dir.is_dir());
        let again = store.ensure_dir("ws").unwrap();
        assert_eq!(dir, again);
    }

    #[test]
    fn exists_requires_a_directory() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        assert!(!store.exists("ws"));
        assert!(!store.exists(""));

        std::fs::write(base.path().join("file"), "x").unwrap();
        assert!(!store.exists("file"));

        store.ensure_dir("ws").unwrap();
        assert!(store.exists("ws"));
    }

    #[test]
    fn remove_deletes_recursively() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        let dir = store.ensure_dir("ws").unwrap();
        std::fs::write(dir.join("snapshot"), "x").unwrap();

        store.remove("ws").unwrap();
        assert!(!store.exists("ws"));
    }

    #[test]
    fn remove_missing_workspace_is_an_error() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        let err = store.remove("absent").unwrap_err();
        assert_eq!(err.kind(), ErrType::InvalidInput);
    }

    #[test]
    fn list_is_sorted_and_ignores_files() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        store.ensure_dir("beta").unwrap();
        store.ensure_dir("alpha").unwrap();
        std::fs::write(base.path().join("stray"), "x").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn list_on_missing_base_dir_is_empty() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path().join("nothing-here"));
        assert!(store.list().unwrap().is_empty());
    }
}
