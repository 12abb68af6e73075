//! DeskUp CLI.

use clap::{ColorChoice, Parser};
use deskup_backend::Device;
use deskup_cli::logging::{LogConfig, LogFormat, init_logging};
use deskup_core::Error;
use deskup_persistence::WorkspaceStore;
use std::io::{self, IsTerminal};

mod cli;
mod commands;
mod tables;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::{run_list, run_remove, run_restore, run_save, run_table, run_windows};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            report(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> deskup_core::Result<()> {
    match &cli.command {
        Command::Table(args) => run_table(args),
        Command::Save(args) => {
            let device = connect(cli)?;
            let store = WorkspaceStore::new(device.data_dir());
            run_save(&store, device.backend(), &args.workspace, args.force)
        }
        Command::Restore(args) => {
            let device = connect(cli)?;
            let store = WorkspaceStore::new(device.data_dir());
            run_restore(&store, device.backend(), &args.workspace)
        }
        Command::List => {
            let device = connect(cli)?;
            run_list(&WorkspaceStore::new(device.data_dir()))
        }
        Command::Windows => {
            let device = connect(cli)?;
            run_windows(device.backend())
        }
        Command::Remove(args) => {
            let device = connect(cli)?;
            run_remove(&WorkspaceStore::new(device.data_dir()), &args.workspace)
        }
    }
}

fn connect(cli: &Cli) -> deskup_core::Result<Device> {
    match &cli.backend {
        Some(name) => deskup_backend::init_named(name),
        None => deskup_backend::init(),
    }
}

/// Render a failure for the user: severity title, friendly message,
/// and a remediation hint when one exists.
fn report(error: &Error) {
    eprintln!("{}: {}", error.title(), error.user_message());
    if let Some(hint) = error.suggestion() {
        eprintln!("hint: {hint}");
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
