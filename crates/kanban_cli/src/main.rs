//! Command-line entry over a kanban store file.
//!
//! # Responsibility
//! - Open (or create) a store database and run the startup pass.
//! - Print the board view and the due-date notification count.
//!
//! Usage: `kanban_cli <db-path> [config.json]`

use chrono::Utc;
use kanban_core::db::open_db;
use kanban_core::{
    default_log_level, init_logging, KanbanConfig, KanbanService, SqliteStore, TaskFilter,
};
use log::error;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        eprintln!("usage: kanban_cli <db-path> [config.json]");
        return ExitCode::from(2);
    };
    let config_path = args.next();

    match run(Path::new(&db_path), config_path.as_deref().map(Path::new)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &Path, config_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => KanbanConfig::load(path)?,
        None => KanbanConfig::default(),
    };

    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, log_dir_for(db_path)?)?;

    let conn = open_db(db_path)?;
    let store = SqliteStore::try_new(&conn)?;
    let service = KanbanService::new(&store, config);

    let report = service.load()?;
    if !report.placeholders.is_empty() || !report.normalize.is_clean() {
        println!(
            "repaired {} group(s), seeded {} placeholder(s)",
            report.normalize.repaired_groups.len(),
            report.placeholders.len()
        );
    }

    for column in service.board_view(&TaskFilter::default())? {
        println!("[{}] {} task(s)", column.board.title(), column.tasks.len());
        for task in &column.tasks {
            println!("  {:>3} {} ({})", task.order_key(), task.title, task.priority);
        }
    }

    let due = service.notifications(Utc::now())?;
    println!("notifications={}", due.len());
    Ok(())
}

fn log_dir_for(db_path: &Path) -> std::io::Result<PathBuf> {
    let parent = db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = parent.join("logs");
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
