use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::TodoList;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
    },
    /// List tasks as JSON, optionally filtered
    List {
        /// Case-insensitive substring filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Mark a task done
    Done {
        /// Task id
        id: Uuid,
    },
    /// Mark a task not done
    Undone {
        /// Task id
        id: Uuid,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: Uuid,
    },
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut todos = TodoList::new();
    todos.load(&db)?;

    match action {
        TodoAction::Add { title } => {
            let item = todos.add(&db, &title)?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        TodoAction::List { search } => {
            let items = match &search {
                Some(q) => todos.search(q),
                None => todos.items().iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        TodoAction::Done { id } => {
            todos.toggle(&db, id, true)?;
            println!("done {id}");
        }
        TodoAction::Undone { id } => {
            todos.toggle(&db, id, false)?;
            println!("undone {id}");
        }
        TodoAction::Delete { id } => {
            todos.remove(&db, id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
