use crate::error::{Error, Result};
use crate::filter::Filters;
use crate::task::{Category, Task};
use chrono::{NaiveDate, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Derived counts over the whole collection, ignoring the view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

/// The task store: an ordered collection of tasks plus the current view
/// filter. Only `completed` is ever mutated on an existing task; everything
/// else is append or remove.
#[derive(Debug, Default)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
    pub filters: Filters,
    /// Highest id issued so far. Seeded from the stored snapshot on load.
    last_id: u64,
    pub selected_category: usize,
    pub selected_task: usize,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filters: Filters::default(),
            last_id: 0,
            selected_category: 0,
            selected_task: 0,
        }
    }

    /// Appends a new task and returns it. Text is trimmed and must be
    /// non-empty; the category and deadline are already typed, so those
    /// cannot be invalid here.
    pub fn add_task(&mut self, text: &str, deadline: NaiveDate, category: Category) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        self.last_id += 1;
        let task = Task {
            id: self.last_id,
            text: text.to_string(),
            deadline,
            category,
            completed: false,
            created_at: Utc::now(),
        };
        debug!(id = task.id, %category, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flips `completed` on the matching task. Returns false (no-op, not an
    /// error) when no task has this id.
    pub fn toggle_task(&mut self, id: u64) -> bool {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            debug!(id, completed = task.completed, "task toggled");
            true
        } else {
            warn!(id, "toggle ignored, no task with this id");
            false
        }
    }

    /// Removes the task with this id. Returns false when no task matched.
    pub fn delete_task(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;
        if removed {
            debug!(id, "task deleted");
        } else {
            warn!(id, "delete ignored, no task with this id");
        }
        removed
    }

    /// The current view: tasks passing the filter, in insertion order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filters.matches(t)).collect()
    }

    /// The current view narrowed to one category column.
    pub fn tasks_in_category(&self, category: Category) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.category == category && self.filters.matches(t))
            .collect()
    }

    /// Id of the task under the cursor, if the selected column still has a
    /// task at the selected row under the current filter.
    pub fn selected_task_id(&self) -> Option<u64> {
        let category = Category::ALL[self.selected_category];
        self.tasks_in_category(category)
            .get(self.selected_task)
            .map(|t| t.id)
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            completed,
            active: total - completed,
        }
    }

    pub fn apply_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.selected_task = 0;
    }

    pub fn reset_filters(&mut self) {
        self.apply_filters(Filters::default());
    }

    /// Writes the whole collection as one pretty-printed JSON snapshot,
    /// overwriting any prior value. The view filter is not persisted.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.tasks)?)?;
        debug!(path = %path.display(), count = self.tasks.len(), "board saved");
        Ok(())
    }

    /// Loads the snapshot at `path`. A missing file is a fresh start, not an
    /// error; a malformed snapshot is surfaced rather than discarded.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut board = Self::new();
        if path.exists() {
            let data = fs::read_to_string(path)?;
            board.tasks = serde_json::from_str(&data)?;
            board.last_id = board.tasks.iter().map(|t| t.id).max().unwrap_or(0);
            debug!(path = %path.display(), count = board.tasks.len(), "board loaded");
        }
        Ok(board)
    }
}
