//! CLI argument definitions for DeskUp.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "deskup",
    version,
    about = "DeskUp - save and restore desktop window layouts per workspace",
    long_about = "Save the windows currently open on your desktop into a named workspace,\n\
                  and restore that workspace later: each saved application is launched\n\
                  again and its window is moved back to the stored geometry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Force a specific window backend by name.
    #[arg(long = "backend", value_name = "NAME", global = true)]
    pub backend: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save all currently open windows into a workspace.
    Save(SaveArgs),

    /// Restore a previously saved workspace.
    Restore(WorkspaceArg),

    /// List all saved workspaces.
    List,

    /// Show the windows currently open on the desktop.
    Windows,

    /// Delete a saved workspace.
    Remove(WorkspaceArg),

    /// Inspect or edit a workspace lookup-table file.
    Table(TableArgs),
}

#[derive(Parser)]
pub struct SaveArgs {
    /// Name of the workspace to create.
    #[arg(value_name = "WORKSPACE")]
    pub workspace: String,

    /// Overwrite the workspace if it already exists.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Parser)]
pub struct WorkspaceArg {
    /// Name of the workspace.
    #[arg(value_name = "WORKSPACE")]
    pub workspace: String,
}

#[derive(Parser)]
pub struct TableArgs {
    /// Path to the lookup-table file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: TableCommand,
}

#[derive(Subcommand)]
pub enum TableCommand {
    /// Print total slots (including deleted).
    Count,

    /// Add an entry.
    Add {
        /// Entry name.
        name: String,
    },

    /// Delete an entry (keeps an empty line).
    Del {
        /// Entry name.
        name: String,
    },

    /// Print the directory path for an entry.
    Dir {
        /// Entry name.
        name: String,
    },

    /// List non-empty entries with line numbers.
    List,

    /// Dump raw file contents with line numbers.
    Raw,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
