mod cli;
mod client;
mod error;
mod import;
mod model;
mod output;
mod storage;
mod store;
mod validate;

use std::io::Read as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use rusqlite::Connection;

use cli::{Cli, Command};
use client::{Action, SyncClient};
use model::TaskDraft;
use store::TaskStore;

fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".prio").join("prio.db"))
}

fn resolve_db_path(cli_db: Option<String>) -> Result<String> {
    match cli_db {
        Some(p) => Ok(p),
        None => {
            let path = default_db_path()?;
            Ok(path
                .to_str()
                .context("default DB path is not valid UTF-8")?
                .to_string())
        }
    }
}

fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_db(db_path: &str) -> Result<Connection> {
    let conn = storage::open(db_path)?;
    storage::init(&conn)?;
    Ok(conn)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db)?;
    ensure_db_dir(&db_path)?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Init => {
            let _conn = open_db(&db_path)?;
            eprintln!("Initialized {db_path}");
        }

        Command::Add {
            title,
            due,
            hours,
            importance,
            deps,
        } => {
            let conn = open_db(&db_path)?;
            let mut store = TaskStore::restore(&conn)?;
            let draft = TaskDraft {
                title,
                due_date: due,
                estimated_hours: hours,
                importance,
                dependencies: deps,
            };
            let (id, title) = {
                let task = store.add(draft, today)?;
                (task.id, task.title.clone())
            };
            store.persist(&conn)?;
            eprintln!("Added task {id} '{title}'");
        }

        Command::Done { index } => {
            if index == 0 {
                bail!("index is 1-based");
            }
            let conn = open_db(&db_path)?;
            let mut store = TaskStore::restore(&conn)?;
            match store.remove(index - 1)? {
                Some(task) => {
                    store.persist(&conn)?;
                    eprintln!("Completed '{}'", task.title);
                }
                None => eprintln!("No tasks to complete"),
            }
        }

        Command::List { json } => {
            let conn = open_db(&db_path)?;
            let store = TaskStore::restore(&conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(store.tasks())?);
            } else {
                print!("{}", output::format_task_list(store.tasks()));
            }
        }

        Command::Import { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {path}"))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    if buf.trim().is_empty() {
                        bail!("no import document provided");
                    }
                    buf
                }
            };
            let batch = import::parse_document(&text)?;
            let malformed = batch.malformed;

            let conn = open_db(&db_path)?;
            let mut store = TaskStore::restore(&conn)?;
            let outcome = store.replace_all(batch.drafts, today);
            store.persist(&conn)?;

            eprintln!("Imported {} task(s)", outcome.kept);
            let skipped = malformed + outcome.skipped;
            if skipped > 0 {
                eprintln!("{skipped} task(s) were skipped (malformed or past due date)");
            }
        }

        Command::Analyze { strategy, json } => {
            run_analysis(&db_path, &cli.api, Action::Analyze, &strategy, json)?;
        }

        Command::Suggest { strategy, json } => {
            run_analysis(&db_path, &cli.api, Action::Suggest, &strategy, json)?;
        }
    }

    Ok(())
}

fn run_analysis(
    db_path: &str,
    api: &str,
    action: Action,
    strategy: &str,
    json: bool,
) -> Result<()> {
    let conn = open_db(db_path)?;
    let store = TaskStore::restore(&conn)?;
    let client = SyncClient::new(api);
    let report = match action {
        Action::Analyze => client.analyze(store.tasks(), strategy)?,
        Action::Suggest => client.suggest(store.tasks(), strategy)?,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::format_report(&report));
    }
    eprintln!("Done using strategy: {}", report.strategy);
    Ok(())
}
