//! CLI driver for the two MemoKeep screens.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memokeep_core` linkage.
//! - Drive home/detail controllers against the configured SQLite store.
//!
//! Arguments are parsed before any storage is opened; an unknown command
//! exits non-zero without touching the database.

use clap::{Parser, Subcommand};
use memokeep_core::{
    snapshot_channel, AppConfig, DetailController, DurableStore, HomeController,
    KeyValueRepository, ScreenError, SqliteKeyValueRepository,
};
use std::process::ExitCode;

type Store = DurableStore<SqliteKeyValueRepository>;

/// MemoKeep - keep one note, see what was saved and what was sent
#[derive(Parser, Debug)]
#[command(name = "memokeep")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the snapshot and persisted lines of the home screen
    Show,
    /// Commit text to durable storage
    Commit {
        /// Words joined with single spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Remove the persisted text
    Clear,
    /// Commit text, then navigate to the detail screen
    Detail {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("memokeep_core ping={}", memokeep_core::ping());
    println!("memokeep_core version={}", memokeep_core::core_version());

    let Some(command) = cli.command else {
        return ExitCode::SUCCESS;
    };

    let store = match AppConfig::from_env().and_then(|config| config.open_store()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(store, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(notice) = err.notice() {
                eprintln!("{}", notice.message());
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(store: Store, command: Command) -> Result<(), ScreenError> {
    let home = HomeController::new(store.clone());
    if let Err(err) = home.on_mount().await {
        // Home stays interactive after a failed load.
        eprintln!("{}", err.notice().map_or("load failed", |n| n.message()));
    }

    match command {
        Command::Show => print_home(&home),
        Command::Commit { text } => {
            home.on_edit(text.join(" "));
            home.on_commit().await?;
            print_home(&home);
        }
        Command::Clear => {
            if let Some(notice) = home.on_delete().await?.applied() {
                println!("{}", notice.message());
            }
            print_home(&home);
        }
        Command::Detail { text } => {
            home.on_edit(text.join(" "));
            home.on_commit().await?;
            let (tx, rx) = snapshot_channel();
            home.on_navigate(tx);
            let detail = DetailController::new(store);
            detail.open(rx).await?;
            let view = detail.view();
            println!("{}", view.snapshot_line.render());
            println!("{}", view.persisted_line.render());
        }
    }
    Ok(())
}

fn print_home<R: KeyValueRepository>(home: &HomeController<R>) {
    let view = home.view();
    println!("{}", view.snapshot_line.render());
    println!("{}", view.persisted_line.render());
}
