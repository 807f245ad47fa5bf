//! Error types for the task store.
//!
//! # Design
//! `EmptyText` is the validation failure for add and rename. `NotFound` is
//! produced by internal lookups only; the public mutations on `TaskStore`
//! swallow it because a UI routinely fires events for rows that a previous
//! event already removed. `DuplicateId` guards restoring a saved sequence.

use thiserror::Error;

use crate::types::TaskId;

/// Errors produced by `TaskStore` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Task text was empty or whitespace-only after trimming.
    #[error("task text must not be blank")]
    EmptyText,

    /// No task with this id exists in the store.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// A restored sequence contained the same id twice.
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),

    /// The id counter is at `u64::MAX`; no fresh id can be issued.
    #[error("task ids exhausted")]
    IdsExhausted,
}
