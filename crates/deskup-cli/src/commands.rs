//! Command implementations.

use std::fs;

use comfy_table::Table;
use deskup_backend::WindowBackend;
use deskup_core::{ErrType, Error, Level, Result};
use deskup_persistence::{
    LookupTable, NAME_BLACKLIST, WorkspaceStore, restore_workspace, save_workspace,
};
use tracing::info;

use crate::cli::{TableArgs, TableCommand};
use crate::tables::apply_table_style;

pub fn run_save(
    store: &WorkspaceStore,
    backend: &dyn WindowBackend,
    workspace: &str,
    force: bool,
) -> Result<()> {
    if !WorkspaceStore::valid_name(workspace) {
        return Err(Error::new(
            Level::Error,
            ErrType::InvalidInput,
            0,
            format!(
                "the workspace name `{workspace}` is not valid \
                 (blacklisted characters: {NAME_BLACKLIST})"
            ),
        ));
    }

    if store.exists(workspace) {
        if !force {
            return Err(Error::new(
                Level::Error,
                ErrType::InvalidInput,
                0,
                format!("the workspace `{workspace}` already exists (pass --force to overwrite)"),
            ));
        }
        info!("overwriting existing workspace `{workspace}`");
        store.remove(workspace)?;
    }

    save_workspace(store, backend, workspace)?;
    println!("The workspace `{workspace}` was saved successfully.");
    Ok(())
}

pub fn run_restore(
    store: &WorkspaceStore,
    backend: &dyn WindowBackend,
    workspace: &str,
) -> Result<()> {
    if !store.exists(workspace) {
        return Err(Error::new(
            Level::Error,
            ErrType::InvalidInput,
            0,
            format!("the workspace `{workspace}` does not exist"),
        ));
    }

    restore_workspace(store, backend, workspace)?;
    println!("The workspace `{workspace}` was restored successfully.");
    Ok(())
}

pub fn run_list(store: &WorkspaceStore) -> Result<()> {
    let names = store.list()?;
    if names.is_empty() {
        println!("No workspaces saved yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Workspace", "Windows"]);
    apply_table_style(&mut table);
    for name in names {
        let count = snapshot_count(store, &name)?;
        table.add_row(vec![name, count.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_windows(backend: &dyn WindowBackend) -> Result<()> {
    let windows = backend.enumerate_windows()?;
    if windows.is_empty() {
        println!("No open windows reported by the {} backend.", backend.name());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Window", "X", "Y", "Width", "Height", "Executable"]);
    apply_table_style(&mut table);
    for window in windows {
        table.add_row(vec![
            window.name,
            window.x.to_string(),
            window.y.to_string(),
            window.w.to_string(),
            window.h.to_string(),
            window.exec_path.display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_remove(store: &WorkspaceStore, workspace: &str) -> Result<()> {
    store.remove(workspace)?;
    println!("The workspace `{workspace}` was removed.");
    Ok(())
}

pub fn run_table(args: &TableArgs) -> Result<()> {
    match &args.command {
        TableCommand::Count => {
            let table = LookupTable::open(&args.file)?;
            println!("{}", table.slots());
        }
        TableCommand::Add { name } => {
            let mut table = LookupTable::open(&args.file)?;
            let line = table.add(name)?;
            println!("added at line {line}");
        }
        TableCommand::Del { name } => {
            let mut table = LookupTable::open(&args.file)?;
            let line = table.remove(name)?;
            println!("deleted line {line} (emptied)");
        }
        TableCommand::Dir { name } => {
            let table = LookupTable::open(&args.file)?;
            match table.dir_for(name) {
                Some(dir) => println!("{}", dir.display()),
                None => {
                    return Err(Error::new(
                        Level::Error,
                        ErrType::NotFound,
                        0,
                        format!("no entry `{name}` in the lookup table"),
                    ));
                }
            }
        }
        TableCommand::List => {
            let table = LookupTable::open(&args.file)?;
            for (line, entry) in table.entries() {
                println!("{line}: {entry}");
            }
            eprintln!("(slots reported by count: {})", table.slots());
        }
        TableCommand::Raw => {
            let content = fs::read_to_string(&args.file)
                .map_err(|e| Error::from_os_error(&e, "open lookup table", 0))?;
            for (line_no, line) in content.lines().enumerate() {
                println!("{line_no}: '{line}'");
            }
        }
    }
    Ok(())
}

fn snapshot_count(store: &WorkspaceStore, name: &str) -> Result<usize> {
    let entries = fs::read_dir(store.workspace_dir(name))
        .map_err(|e| Error::from_os_error(&e, "read workspace directory", 0))?;
    Ok(entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskup_backend::HeadlessBackend;
    use deskup_core::WindowDesc;
    use tempfile::tempdir;

    #[test]
    fn save_refuses_existing_workspace_without_force() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        let backend = HeadlessBackend::new();

        run_save(&store, &backend, "ws", false).unwrap();
        let err = run_save(&store, &backend, "ws", false).unwrap_err();
        assert_eq!(err.kind(), ErrType::InvalidInput);

        run_save(&store, &backend, "ws", true).unwrap();
    }

    #[test]
    fn force_save_replaces_previous_contents() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        let backend = HeadlessBackend::with_windows(vec![WindowDesc::new(
            "Old", 0, 0, 100, 100, "/usr/bin/old",
        )]);

        run_save(&store, &backend, "ws", false).unwrap();
        backend.seed(vec![WindowDesc::new("New", 0, 0, 100, 100, "/usr/bin/new")]);
        run_save(&store, &backend, "ws", true).unwrap();

        let dir = store.workspace_dir("ws");
        assert!(!dir.join("Old").exists());
        assert!(dir.join("New").is_file());
    }

    #[test]
    fn restore_refuses_missing_workspace() {
        let base = tempdir().unwrap();
        let store = WorkspaceStore::new(base.path());
        let backend = HeadlessBackend::new();

        let err = run_restore(&store, &backend, "absent").unwrap_err();
        assert_eq!(err.kind(), ErrType::InvalidInput);
    }

    #[test]
    fn table_dir_for_missing_entry_is_not_found() {
        let base = tempdir().unwrap();
        let args = TableArgs {
            file: base.path().join("t"),
            command: TableCommand::Dir {
                name: "absent".to_owned(),
            },
        };
        let err = run_table(&args).unwrap_err();
        assert_eq!(err.kind(), ErrType::NotFound);
    }
}
