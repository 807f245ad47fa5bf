//! Task-list management core.
//!
//! # Overview
//! Owns an ordered list of tasks and exposes the operations a task row
//! needs: add, delete, rename, toggle completion, toggle pin, and a
//! pinned-first numbered display list. Presentation layers (the C ABI in
//! `tasklist-ffi`, the HTTP adapter in `tasklist-server`) bind to this API
//! and keep their own transient UI state.
//!
//! # Design
//! - `TaskStore` is synchronous and owns its data; sharing across threads is
//!   the adapter's concern.
//! - Operations on absent ids are no-ops, never errors.
//! - The display list is recomputed per read; numbering is never stored.
//! - Types use owned `String` fields to simplify FFI and JSON mapping.

pub mod config;
pub mod display;
pub mod edit;
pub mod error;
pub mod store;
pub mod types;

pub use config::{PinOrder, StoreConfig};
pub use edit::{EditOutcome, RowEditor, RowLabels};
pub use error::TaskError;
pub use store::TaskStore;
pub use types::{DisplayItem, Task, TaskId};
