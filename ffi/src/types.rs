//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use tasklist_core::{DisplayItem, PinOrder, Task, TaskError, TaskStore};

/// Opaque handle to a `TaskStore`. C callers receive a pointer to this and
/// pass it back into every FFI function.
pub struct FfiTaskStore {
    pub(crate) inner: TaskStore,
}

/// Pin tie-break as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiPinOrder {
    Insertion = 0,
    RecentlyPinned = 1,
}

impl From<FfiPinOrder> for PinOrder {
    fn from(order: FfiPinOrder) -> Self {
        match order {
            FfiPinOrder::Insertion => PinOrder::Insertion,
            FfiPinOrder::RecentlyPinned => PinOrder::RecentlyPinned,
        }
    }
}

/// Error codes returned in `FfiTaskResult` and by `tasklist_store_restore`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    EmptyText = 1,
    /// Reserved. No current function returns it: mutations on absent ids
    /// are no-ops.
    NotFound = 2,
    DuplicateId = 3,
    Deserialization = 4,
    Panic = 5,
    NullArg = 6,
    IdsExhausted = 7,
}

impl From<&TaskError> for FfiErrorCode {
    fn from(err: &TaskError) -> Self {
        match err {
            TaskError::EmptyText => FfiErrorCode::EmptyText,
            TaskError::NotFound(_) => FfiErrorCode::NotFound,
            TaskError::DuplicateId(_) => FfiErrorCode::DuplicateId,
            TaskError::IdsExhausted => FfiErrorCode::IdsExhausted,
        }
    }
}

/// A single task exposed to C.
#[repr(C)]
pub struct FfiTask {
    pub id: u64,
    pub text: *mut c_char,
    pub completed: bool,
    pub pinned: bool,
}

impl FfiTask {
    pub(crate) fn from_core(task: Task) -> Self {
        FfiTask {
            id: task.id.get(),
            text: into_c_string(task.text),
            completed: task.completed,
            pinned: task.pinned,
        }
    }
}

/// One numbered row of the display list.
#[repr(C)]
pub struct FfiDisplayItem {
    pub item_number: u32,
    pub task: FfiTask,
}

/// The pinned-first display list exposed to C.
#[repr(C)]
pub struct FfiDisplayList {
    pub items: *mut FfiDisplayItem,
    pub len: u32,
}

impl FfiDisplayList {
    /// Convert a core display list into a heap-allocated `FfiDisplayList`.
    pub(crate) fn from_core(view: Vec<DisplayItem>) -> *mut Self {
        let len = saturating_u32(view.len());
        let items: Box<[FfiDisplayItem]> = view
            .into_iter()
            .map(|item| FfiDisplayItem {
                item_number: saturating_u32(item.item_number),
                task: FfiTask::from_core(item.task),
            })
            .collect();

        // Freed in `tasklist_free_display_list` as a boxed slice of `len`.
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiDisplayItem
        };

        Box::into_raw(Box::new(FfiDisplayList { items, len }))
    }
}

/// Result envelope for `tasklist_add_task`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `task`
/// points to the created task. On failure `error_code` describes the
/// category, `error_message` is a human-readable C string, and `task` is
/// null.
#[repr(C)]
pub struct FfiTaskResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub task: *mut FfiTask,
}

impl FfiTaskResult {
    pub(crate) fn ok_task(task: Task) -> *mut Self {
        let result = Box::new(FfiTaskResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            task: Box::into_raw(Box::new(FfiTask::from_core(task))),
        });
        Box::into_raw(result)
    }

    pub(crate) fn from_error(err: TaskError) -> *mut Self {
        Self::error(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg.to_string())
    }

    fn error(error_code: FfiErrorCode, msg: String) -> *mut Self {
        let result = Box::new(FfiTaskResult {
            error_code,
            error_message: into_c_string(msg),
            task: std::ptr::null_mut(),
        });
        Box::into_raw(result)
    }
}

/// Narrow a count to the C `uint32_t` fields, clamping instead of wrapping.
pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Hand a Rust string to C. Interior NULs cannot be represented, so such a
/// string becomes empty rather than panicking.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}
