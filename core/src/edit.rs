//! Per-row edit session owned by an adapter.
//!
//! # Design
//! Uncommitted text never enters the store. A `RowEditor` holds the edit
//! flag and the text buffer for one row; only `commit` talks to the store,
//! and only through `rename_task`. A rejected commit reverts the buffer to
//! the store's current text, so the row keeps showing what is committed.
//!
//! Submit and blur both commit. When both fire for one edit the second call
//! sees the session already closed and returns `EditOutcome::NotEditing`.

use crate::store::TaskStore;
use crate::types::{DisplayItem, Task, TaskId};

/// Result of an edit-session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Edit mode entered; the buffer holds the committed text.
    Started,
    /// The store accepted the new text.
    Renamed,
    /// Blank text or a vanished task; the store is unchanged.
    Rejected,
    /// Commit arrived while no edit was open.
    NotEditing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEditor {
    id: TaskId,
    editing: bool,
    buffer: String,
}

impl RowEditor {
    pub fn new(task: &Task) -> Self {
        Self {
            id: task.id,
            editing: false,
            buffer: task.text.clone(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer with what the input widget currently shows.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Open an edit, seeding the buffer from the store.
    pub fn begin(&mut self, store: &TaskStore) -> EditOutcome {
        self.editing = true;
        self.revert(store);
        EditOutcome::Started
    }

    /// The Edit/Save button: open an edit, or commit the open one.
    pub fn toggle(&mut self, store: &mut TaskStore) -> EditOutcome {
        if self.editing {
            self.commit(store)
        } else {
            self.begin(store)
        }
    }

    /// Submit or blur. Always closes the edit.
    pub fn commit(&mut self, store: &mut TaskStore) -> EditOutcome {
        if !self.editing {
            return EditOutcome::NotEditing;
        }
        self.editing = false;

        let renamed = store.rename_task(self.id, &self.buffer);
        self.revert(store);
        if renamed {
            EditOutcome::Renamed
        } else {
            EditOutcome::Rejected
        }
    }

    /// Close the edit without touching the store.
    pub fn cancel(&mut self, store: &TaskStore) {
        self.editing = false;
        self.revert(store);
    }

    fn revert(&mut self, store: &TaskStore) {
        if let Some(task) = store.get(self.id) {
            self.buffer.clone_from(&task.text);
        }
    }
}

/// Text and flags a row binds to, derived from one display item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    /// Numbering prefix, e.g. `"3."`.
    pub number: String,
    pub strikethrough: bool,
    pub pin_action: &'static str,
    pub edit_action: &'static str,
}

impl RowLabels {
    pub fn for_item(item: &DisplayItem, editing: bool) -> Self {
        Self {
            number: format!("{}.", item.item_number),
            strikethrough: item.task.completed,
            pin_action: if item.task.pinned { "Unpin" } else { "Pin" },
            edit_action: if editing { "Save" } else { "Edit" },
        }
    }
}
