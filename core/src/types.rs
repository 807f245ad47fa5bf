//! Domain types shared by the store and every adapter.
//!
//! # Design
//! `Task` carries exactly the four fields a row binds to: id, text, the
//! completion flag and the pin flag. Display numbering is not a field; it is
//! derived per read and travels alongside the task in `DisplayItem`.
//!
//! All fields use owned types so values can be handed across the FFI and
//! HTTP boundaries without lifetime concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned task identifier. Monotonic and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub pinned: bool,
}

/// One row of the derived display list: a 1-based position plus the task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub item_number: usize,
    pub task: Task,
}
