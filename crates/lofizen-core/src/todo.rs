//! Task list over the `todo` partition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::storage::{Database, Partition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// In-memory task list with write-through persistence.
///
/// Like the recorder, a failed write is logged and the in-memory state
/// stays authoritative for the process lifetime.
#[derive(Debug, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn load(&mut self, db: &Database) -> Result<(), StorageError> {
        self.items = db.get_all(Partition::Todo)?;
        // Newest first, matching insertion order in the original.
        self.items
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(())
    }

    /// Add a new task. The title is trimmed and must be non-empty.
    pub fn add(&mut self, db: &Database, title: &str) -> Result<TodoItem> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty").into());
        }
        let item = TodoItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            done: false,
            created_at: Utc::now(),
        };
        if let Err(err) = db.put(Partition::Todo, &item.id.to_string(), &item) {
            warn!(id = %item.id, %err, "todo not persisted; keeping in-memory only");
        }
        self.items.insert(0, item.clone());
        Ok(item)
    }

    pub fn toggle(&mut self, db: &Database, id: Uuid, done: bool) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound {
                kind: "todo",
                id: id.to_string(),
            })?;
        item.done = done;
        let item = item.clone();
        if let Err(err) = db.put(Partition::Todo, &id.to_string(), &item) {
            warn!(%id, %err, "todo update not persisted");
        }
        Ok(())
    }

    pub fn remove(&mut self, db: &Database, id: Uuid) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        if self.items.len() == before {
            return Err(CoreError::NotFound {
                kind: "todo",
                id: id.to_string(),
            });
        }
        db.delete(Partition::Todo, &id.to_string())?;
        Ok(())
    }

    pub fn clear(&mut self, db: &Database) -> Result<(), StorageError> {
        self.items.clear();
        db.clear(Partition::Todo)
    }

    /// Case-insensitive substring filter.
    pub fn search(&self, query: &str) -> Vec<&TodoItem> {
        let q = query.to_lowercase();
        self.items
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&q))
            .collect()
    }
}
