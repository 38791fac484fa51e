use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::path::PathBuf;
use tasktrack::model::TIMESTAMP_FORMAT;
use tasktrack::{Status, Task, TaskStore, parse_task_id};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Track short personal tasks in a JSON file")]
#[command(version)]
struct Cli {
    /// Path to the task file (default: tasks.json in the current directory)
    #[arg(short, long, default_value = "tasks.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add { description: String },

    /// Change the description of an existing task
    Update { id: String, description: String },

    /// Remove a task
    Delete { id: String },

    /// Mark a task as todo
    MarkTodo { id: String },

    /// Mark a task as in-progress
    MarkInProgress { id: String },

    /// Mark a task as done
    MarkDone { id: String },

    /// List tasks, optionally only those with the given status
    List { status: Option<String> },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = TaskStore::new(cli.file);

    match cli.command {
        Commands::Add { description } => {
            let task = store.create(&description)?;
            println!("Task added successfully (ID: {})", task.id);
        }
        Commands::Update { id, description } => {
            let id = parse_task_id(&id)?;
            store.update(id, &description)?;
            println!("Task {id} updated successfully");
        }
        Commands::Delete { id } => {
            let id = parse_task_id(&id)?;
            store.delete(id)?;
            println!("Task {id} deleted successfully");
        }
        Commands::MarkTodo { id } => {
            let task = store.mark_todo(parse_task_id(&id)?)?;
            println!("Task {} marked as {}", task.id, task.status);
        }
        Commands::MarkInProgress { id } => {
            let task = store.mark_in_progress(parse_task_id(&id)?)?;
            println!("Task {} marked as {}", task.id, task.status);
        }
        Commands::MarkDone { id } => {
            let task = store.mark_done(parse_task_id(&id)?)?;
            println!("Task {} marked as {}", task.id, task.status);
        }
        Commands::List { status } => {
            let filter = match status {
                Some(ref token) => Some(token.parse::<Status>()?),
                None => None,
            };
            let tasks = store.list(filter)?;

            if tasks.is_empty() {
                match status {
                    Some(token) => println!("No tasks with status '{token}'"),
                    None => println!("No tasks found"),
                }
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
        }
    }

    Ok(())
}

/// Print the multi-line block for one task
fn print_task(task: &Task) {
    println!(
        "[{}] ({}) {}",
        task.id,
        status_label(task.status),
        task.description
    );
    println!("  createdAt: {}", task.created_at.format(TIMESTAMP_FORMAT));
    println!("  updatedAt: {}", task.updated_at.format(TIMESTAMP_FORMAT));
    println!();
}

/// Status token colorized for terminal output, plain when piped
fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Todo => status.as_str().yellow(),
        Status::InProgress => status.as_str().blue(),
        Status::Done => status.as_str().green(),
    }
}
