//! Journi terminal entry point.
//!
//! # Responsibility
//! - Start logging and make sure the default database has its table.
//! - Hand stdin/stdout to the interactive shell.

mod shell;

use journi_core::{init_logging, initialize, AppConfig, SqliteEntryStore, ViewController};
use log::error;
use shell::Shell;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = AppConfig::default();

    // The journal stays usable without a log file.
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("journi: logging disabled: {err}");
    }

    if let Err(err) = initialize(config.db_path.clone()) {
        error!("event=cli_start module=cli status=error error={err}");
        eprintln!("journi: cannot initialize {}: {err}", config.db_path.display());
        return ExitCode::FAILURE;
    }

    let controller = match ViewController::open(SqliteEntryStore::new(config.db_path.clone())) {
        Ok(controller) => controller,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("journi: cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut shell = Shell::new(controller, stdout.lock());
    match shell.run(io::stdin().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("journi: {err}");
            ExitCode::FAILURE
        }
    }
}
