//! Workspace lookup table.
//!
//! A plain-text file mapping workspace entries to directory slots:
//!
//! ```text
//! 4
//! coding
//! browsing
//!
//! writing
//! ```
//!
//! The first line is the slot count (deleted slots included); every
//! following line is one entry. An entry may be any combination of
//! characters except a line break, and a blank line is a valid,
//! deleted slot: removing an entry blanks its line instead of
//! shifting the ones below it, so slot numbers stay stable. The slot
//! number doubles as the name of the workspace directory next to the
//! table file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use deskup_core::{ErrType, Error, Level, Result, Status};
use tracing::warn;

/// 1-based slot number of an entry inside the table.
pub type Line = usize;

/// In-memory view of a lookup-table file.
///
/// Mutations are written back immediately, with the count line
/// rewritten so the file is always self-consistent.
pub struct LookupTable {
    path: PathBuf,
    slots: Vec<String>,
}

impl LookupTable {
    /// Open a table file, creating an empty one when the path does not
    /// point at a regular file yet. A file whose count line cannot be
    /// parsed is cleared.
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Error::new(
                Level::Error,
                ErrType::InvalidInput,
                0,
                "lookup table path is empty",
            ));
        }

        if !path.is_file() {
            let table = Self {
                path: path.to_path_buf(),
                slots: Vec::new(),
            };
            table.persist()?;
            return Ok(table);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Error::new(
                Level::Error,
                ErrType::Io,
                0,
                format!("cannot open lookup table {}: {e}", path.display()),
            )
        })?;

        let mut lines: Vec<&str> = content.split('\n').collect();
        if content.ends_with('\n') {
            lines.pop();
        }

        let mut table = Self {
            path: path.to_path_buf(),
            slots: Vec::new(),
        };

        match lines.first().and_then(|l| l.trim().parse::<usize>().ok()) {
            Some(count) => {
                table.slots = lines[1..].iter().map(|&l| l.to_owned()).collect();
                if count != table.slots.len() {
                    warn!(
                        "lookup table {} count line says {count}, found {} slots; rewriting",
                        path.display(),
                        table.slots.len()
                    );
                    table.persist()?;
                }
            }
            None => {
                warn!(
                    "lookup table {} has no valid count line; clearing",
                    path.display()
                );
                table.persist()?;
            }
        }

        Ok(table)
    }

    /// The file this table lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total slots, deleted ones included.
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of live (non-deleted) entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Whether the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot number of an entry, if present.
    pub fn line_of(&self, entry: &str) -> Option<Line> {
        if entry.is_empty() {
            return None;
        }
        self.slots.iter().position(|s| s == entry).map(|i| i + 1)
    }

    /// Live entries with their slot numbers, in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (Line, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| (i + 1, s.as_str()))
    }

    /// Add an entry, reusing the first deleted slot when one exists.
    ///
    /// Returns the slot the entry was written to.
    pub fn add(&mut self, entry: &str) -> Result<Line> {
        if entry.is_empty() || entry.contains('\n') {
            return Err(Error::new(
                Level::Error,
                ErrType::InvalidInput,
                0,
                "lookup entries must be non-empty and single-line",
            ));
        }
        if let Some(line) = self.line_of(entry) {
            return Err(Error::new(
                Level::Error,
                ErrType::InvalidInput,
                0,
                format!("entry `{entry}` already exists at line {line}"),
            ));
        }

        let line = match self.slots.iter().position(|s| s.is_empty()) {
            Some(free) => {
                self.slots[free] = entry.to_owned();
                free + 1
            }
            None => {
                self.slots.push(entry.to_owned());
                self.slots.len()
            }
        };
        self.persist()?;
        Ok(line)
    }

    /// Delete an entry by blanking its slot.
    ///
    /// Returns the slot that was emptied.
    pub fn remove(&mut self, entry: &str) -> Result<Line> {
        let Some(line) = self.line_of(entry) else {
            return Err(Error::new(
                Level::Error,
                ErrType::NotFound,
                0,
                format!("no entry `{entry}` in the lookup table"),
            ));
        };
        self.slots[line - 1].clear();
        self.persist()?;
        Ok(line)
    }

    /// Directory associated with an entry: the table's parent
    /// directory joined with the entry's slot number.
    pub fn dir_for(&self, entry: &str) -> Option<PathBuf> {
        let line = self.line_of(entry)?;
        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        Some(parent.join(line.to_string()))
    }

    fn persist(&self) -> Status {
        let mut content = String::new();
        content.push_str(&self.slots.len().to_string());
        content.push('\n');
        for slot in &self.slots {
            content.push_str(slot);
            content.push('\n');
        }

        let io_err = |e: std::io::Error| {
            Error::new(
                Level::Error,
                ErrType::Io,
                0,
                format!("cannot write lookup table {}: {e}", self.path.display()),
            )
        };

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = self.path.with_file_name(format!("{file_name}.tmp"));

        let mut file = File::create(&temp_path).map_err(io_err)?;
        file.write_all(content.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_an_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workspaceTable.txt");

        let table = LookupTable::open(&path).unwrap();
        assert_eq!(table.slots(), 0);
        assert!(table.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");
    }

    #[test]
    fn add_appends_and_returns_lines() {
        let dir = tempdir().unwrap();
        let mut table = LookupTable::open(&dir.path().join("t")).unwrap();

        assert_eq!(table.add("coding").unwrap(), 1);
        assert_eq!(table.add("browsing").unwrap(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.line_of("browsing"), Some(2));
    }

    #[test]
    fn remove_blanks_the_slot_and_keeps_numbering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t");
        let mut table = LookupTable::open(&path).unwrap();
        table.add("coding").unwrap();
        table.add("browsing").unwrap();
        table.add("writing").unwrap();

        assert_eq!(table.remove("browsing").unwrap(), 2);
        assert_eq!(table.slots(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.line_of("writing"), Some(3));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "3\ncoding\n\nwriting\n"
        );
    }

    #[test]
    fn add_reuses_the_first_deleted_slot() {
        let dir = tempdir().unwrap();
        let mut table = LookupTable::open(&dir.path().join("t")).unwrap();
        table.add("coding").unwrap();
        table.add("browsing").unwrap();
        table.remove("coding").unwrap();

        assert_eq!(table.add("gaming").unwrap(), 1);
        assert_eq!(table.slots(), 2);
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let dir = tempdir().unwrap();
        let mut table = LookupTable::open(&dir.path().join("t")).unwrap();
        table.add("coding").unwrap();
        let err = table.add("coding").unwrap_err();
        assert_eq!(err.kind(), ErrType::InvalidInput);
    }

    #[test]
    fn removing_a_missing_entry_is_not_found() {
        let dir = tempdir().unwrap();
        let mut table = LookupTable::open(&dir.path().join("t")).unwrap();
        let err = table.remove("absent").unwrap_err();
        assert_eq!(err.kind(), ErrType::NotFound);
    }

    #[test]
    fn table_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t");
        {
            let mut table = LookupTable::open(&path).unwrap();
            table.add("coding").unwrap();
            table.add("browsing").unwrap();
            table.remove("coding").unwrap();
        }

        let table = LookupTable::open(&path).unwrap();
        assert_eq!(table.slots(), 2);
        assert_eq!(table.line_of("browsing"), Some(2));
        assert_eq!(table.line_of("coding"), None);
    }

    #[test]
    fn malformed_count_line_clears_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "not-a-number\ncoding\n").unwrap();

        let table = LookupTable::open(&path).unwrap();
        assert_eq!(table.slots(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");
    }

    #[test]
    fn stale_count_line_is_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "7\ncoding\nbrowsing\n").unwrap();

        let table = LookupTable::open(&path).unwrap();
        assert_eq!(table.slots(), 2);
        assert!(fs::read_to_string(&path).unwrap().starts_with("2\n"));
    }

    #[test]
    fn dir_for_uses_the_slot_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t");
        let mut table = LookupTable::open(&path).unwrap();
        table.add("coding").unwrap();
        table.add("browsing").unwrap();

        assert_eq!(table.dir_for("browsing"), Some(dir.path().join("2")));
        assert_eq!(table.dir_for("absent"), None);
    }
}
