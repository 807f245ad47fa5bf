//! In-memory owner of the task sequence.
//!
//! # Design
//! `TaskStore` keeps tasks in insertion order and is the only place they are
//! mutated. Every mutation that takes an id is total: an absent id is logged
//! and ignored, never surfaced as an error, because adapters routinely act
//! on stale rows (a blur-triggered rename racing a delete, a double tap on
//! delete). The display list is derived on demand in `display_order`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::StoreConfig;
use crate::display::display_order;
use crate::error::TaskError;
use crate::types::{DisplayItem, Task, TaskId};

/// Ordered collection of tasks plus the mutation API adapters call into.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// Highest id ever issued. Ids are never reused, even after deletion.
    last_id: u64,
    /// Pin sequence per pinned task, for `PinOrder::RecentlyPinned`.
    pin_stamps: HashMap<TaskId, u64>,
    pin_clock: u64,
    config: StoreConfig,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuild a store from a previously saved sequence (insertion order).
    ///
    /// Text is trimmed on the way in. Fails on blank text or a repeated id.
    /// New ids continue after the largest restored one.
    pub fn from_tasks(tasks: Vec<Task>, config: StoreConfig) -> Result<Self, TaskError> {
        let mut store = Self::with_config(config);
        let mut seen = HashSet::with_capacity(tasks.len());

        for mut task in tasks {
            if !seen.insert(task.id) {
                return Err(TaskError::DuplicateId(task.id));
            }
            task.text = normalize(&task.text)?;
            store.last_id = store.last_id.max(task.id.get());
            if task.pinned {
                store.stamp_pin(task.id);
            }
            store.tasks.push(task);
        }

        debug!(count = store.tasks.len(), last_id = store.last_id, "store restored");
        Ok(store)
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Owned copy of the sequence for an external persistence layer.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Append a new task. Blank text, or a counter with no id left to issue,
    /// is rejected with no state change.
    pub fn add_task(&mut self, text: &str) -> Result<Task, TaskError> {
        let text = normalize(text)?;
        let id = self.last_id.checked_add(1).ok_or(TaskError::IdsExhausted)?;
        self.last_id = id;
        let task = Task {
            id: TaskId::new(id),
            text,
            completed: false,
            pinned: false,
        };
        debug!(id = %task.id, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn delete_task(&mut self, id: TaskId) {
        match self.position(id) {
            Ok(index) => {
                self.tasks.remove(index);
                self.pin_stamps.remove(&id);
                debug!(%id, "task deleted");
            }
            Err(err) => ignore_missing("delete_task", &err),
        }
    }

    pub fn toggle_completed(&mut self, id: TaskId) {
        match self.task_mut(id) {
            Ok(task) => {
                task.completed = !task.completed;
                debug!(%id, completed = task.completed, "completion toggled");
            }
            Err(err) => ignore_missing("toggle_completed", &err),
        }
    }

    /// Flip the pin flag. The task moves between display groups on the next
    /// read; its insertion position is untouched.
    pub fn toggle_pin(&mut self, id: TaskId) {
        let pinned = match self.task_mut(id) {
            Ok(task) => {
                task.pinned = !task.pinned;
                task.pinned
            }
            Err(err) => {
                ignore_missing("toggle_pin", &err);
                return;
            }
        };

        if pinned {
            self.stamp_pin(id);
        } else {
            self.pin_stamps.remove(&id);
        }
        debug!(%id, pinned, "pin toggled");
    }

    /// Replace the text of a task with the trimmed `text`.
    ///
    /// Returns `false` and leaves the task untouched when the trimmed text is
    /// blank or the id is absent.
    pub fn rename_task(&mut self, id: TaskId, text: &str) -> bool {
        let text = match normalize(text) {
            Ok(text) => text,
            Err(err) => {
                debug!(%id, %err, "rename rejected");
                return false;
            }
        };

        match self.task_mut(id) {
            Ok(task) => {
                task.text = text;
                debug!(%id, "task renamed");
                true
            }
            Err(err) => {
                ignore_missing("rename_task", &err);
                false
            }
        }
    }

    /// Pinned-first, numbered view of the current tasks.
    pub fn display_list(&self) -> Vec<DisplayItem> {
        display_order(&self.tasks, &self.pin_stamps, self.config.pin_order)
    }

    fn position(&self, id: TaskId) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    fn stamp_pin(&mut self, id: TaskId) {
        self.pin_clock += 1;
        self.pin_stamps.insert(id, self.pin_clock);
    }
}

/// Trim `text`, rejecting what is left if it is empty.
fn normalize(text: &str) -> Result<String, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText);
    }
    Ok(trimmed.to_string())
}

fn ignore_missing(op: &str, err: &TaskError) {
    debug!(op, %err, "ignoring operation on missing task");
}
