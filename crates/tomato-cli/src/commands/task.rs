use clap::Subcommand;
use tomato_core::Task;

use super::open_app;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Estimated pomodoros (1-20)
        #[arg(long, default_value = "1")]
        est: u32,
    },
    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done
    Done { id: String },
    /// Mark a task not done
    Undo { id: String },
    /// Change a task's title
    Rename { id: String, title: String },
    /// Count one more pomodoro spent on a task
    Spent { id: String },
    /// Delete a task
    Delete { id: String },
    /// Delete every finished task
    ClearCompleted,
    /// Move a task to a position (0-based)
    Move { id: String, index: usize },
}

fn line(task: &Task) -> String {
    format!(
        "[{}] {}  {}  {}/{} pomo",
        if task.done { "x" } else { " " },
        task.id,
        task.title,
        task.spent,
        task.est
    )
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        TaskAction::Add { title, est } => {
            let task = app.add_task(&title, est)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(app.tasks())?);
            } else if app.tasks().is_empty() {
                println!("no tasks");
            } else {
                for task in app.tasks().iter() {
                    println!("{}", line(task));
                }
            }
        }
        TaskAction::Done { id } => {
            app.set_task_done(&id, true)?;
            println!("done: {id}");
        }
        TaskAction::Undo { id } => {
            app.set_task_done(&id, false)?;
            println!("open: {id}");
        }
        TaskAction::Rename { id, title } => {
            app.rename_task(&id, &title)?;
            println!("renamed: {id}");
        }
        TaskAction::Spent { id } => {
            let spent = app.add_task_spent(&id)?;
            println!("{id}: {spent} spent");
        }
        TaskAction::Delete { id } => {
            let task = app.remove_task(&id)?;
            println!("deleted: {}", task.title);
        }
        TaskAction::ClearCompleted => {
            let removed = app.clear_completed_tasks();
            println!("removed {removed} completed task(s)");
        }
        TaskAction::Move { id, index } => {
            app.move_task(&id, index)?;
            println!("moved: {id}");
        }
    }
    Ok(())
}
