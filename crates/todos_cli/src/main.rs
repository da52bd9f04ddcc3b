//! Command-line entry point for the todo store.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the database.
//! - Map subcommands onto `TodoStore` operations and print JSON results.
//!
//! Exit codes: `0` success, `1` rejected input or missing todo, `2` storage
//! or startup failure.

use clap::{Parser, Subcommand};
use log::warn;
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;
use todos_core::db::open_db;
use todos_core::{
    init_logging, OperationResult, ReadOutcome, SqliteTodoRepository, TodoId, TodoInput,
    TodoStore, TodosConfig,
};

#[derive(Parser)]
#[command(name = "todos", version, about = "Manage todo items in a local SQLite store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List todos ordered by creation time
    List {
        /// `desc` for newest first; anything else lists oldest first
        #[arg(long)]
        order: Option<String>,
        /// `true` or `false` to filter by completion
        #[arg(long)]
        completed: Option<String>,
    },
    /// Show one todo
    Show { id: TodoId },
    /// Create a todo
    Add {
        title: String,
        /// ISO 8601 due date
        #[arg(long)]
        due: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
    },
    /// Change supplied fields of a todo
    Edit {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a todo
    Rm { id: TodoId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = TodosConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command, config: &TodosConfig) -> Result<ExitCode, Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;
    let store = TodoStore::new(SqliteTodoRepository::try_new(&conn)?);

    match command {
        Command::List { order, completed } => {
            let todos = store.list_todos(order.as_deref(), completed.as_deref())?;
            print_json(&todos)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { id } => match store.read_todo(id) {
            ReadOutcome::Found(item) => {
                print_json(&item)?;
                Ok(ExitCode::SUCCESS)
            }
            ReadOutcome::NotFound => {
                eprintln!("todo {id} not found");
                Ok(ExitCode::from(1))
            }
            ReadOutcome::StoreError(err) => Err(err.into()),
        },
        Command::Add {
            title,
            due,
            position,
        } => {
            let mut input = TodoInput::new().with_title(title);
            input.due = due.map(Into::into);
            input.position = position.map(Into::into);
            report(store.create_todo(&input)?)
        }
        Command::Edit {
            id,
            title,
            due,
            position,
            completed,
        } => {
            let input = TodoInput {
                title: title.map(Into::into),
                due: due.map(Into::into),
                position: position.map(Into::into),
                completed: completed.map(Into::into),
            };
            if input.is_empty() {
                warn!("event=cli_edit module=cli status=empty id={id}");
            }
            report(store.update_todo(id, &input)?)
        }
        Command::Rm { id } => {
            let deleted = store.delete_todo(id)?;
            print_json(&serde_json::json!({ "id": id, "deleted": deleted }))?;
            Ok(if deleted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn report(result: OperationResult) -> Result<ExitCode, Box<dyn Error>> {
    print_json(&result)?;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
