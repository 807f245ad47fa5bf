//! C-ABI wrapper around `tasklist-core`.
//!
//! # Overview
//! Exposes the task store through `extern "C"` functions so a native host UI
//! (a mobile list screen, say) can drive the same add / delete / rename /
//! toggle / display contract as any Rust adapter.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Id-taking mutations mirror the core: a null store or an absent id is a
//!   no-op.
//! - The C caller owns all returned pointers and must call the matching
//!   `tasklist_free_*` function to release them.
//! - Snapshot and restore go through JSON so the host's persistence layer
//!   never needs to know the in-memory layout.

pub mod types;

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use tasklist_core::{StoreConfig, Task, TaskId, TaskStore};
use tracing::warn;

use types::*;

/// Read a caller-provided C string. Invalid UTF-8 is replaced, not rejected.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn read_str<'a>(ptr: *const c_char) -> Cow<'a, str> {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Create an empty store with insertion-order pin tie-break.
///
/// The caller must free the returned pointer with `tasklist_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_store_new() -> *mut FfiTaskStore {
    tasklist_store_new_with_pin_order(FfiPinOrder::Insertion)
}

/// Create an empty store with the given pin tie-break.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_store_new_with_pin_order(order: FfiPinOrder) -> *mut FfiTaskStore {
    catch_unwind(|| {
        let config = StoreConfig {
            pin_order: order.into(),
        };
        Box::into_raw(Box::new(FfiTaskStore {
            inner: TaskStore::with_config(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Restore a store from a JSON array of tasks produced by
/// `tasklist_snapshot_json`.
///
/// Returns null on failure. If `error_code` is non-null it receives `Ok` or
/// the failure category (`NullArg`, `Deserialization`, `EmptyText`,
/// `DuplicateId`, `Panic`).
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_store_restore(
    json: *const c_char,
    order: FfiPinOrder,
    error_code: *mut FfiErrorCode,
) -> *mut FfiTaskStore {
    let (store, code) = catch_unwind(|| {
        if json.is_null() {
            return (std::ptr::null_mut(), FfiErrorCode::NullArg);
        }
        let raw = unsafe { read_str(json) };
        let tasks: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "snapshot is not valid task JSON");
                return (std::ptr::null_mut(), FfiErrorCode::Deserialization);
            }
        };
        let config = StoreConfig {
            pin_order: order.into(),
        };
        match TaskStore::from_tasks(tasks, config) {
            Ok(inner) => (
                Box::into_raw(Box::new(FfiTaskStore { inner })),
                FfiErrorCode::Ok,
            ),
            Err(e) => {
                warn!(error = %e, "snapshot rejected");
                (std::ptr::null_mut(), FfiErrorCode::from(&e))
            }
        }
    })
    .unwrap_or((std::ptr::null_mut(), FfiErrorCode::Panic));

    if !error_code.is_null() {
        unsafe { *error_code = code };
    }
    store
}

/// Free a store created by `tasklist_store_new*` or `tasklist_store_restore`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_store_free(store: *mut FfiTaskStore) {
    if !store.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(store) });
        });
    }
}

/// Number of tasks in the store. Zero for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_store_len(store: *const FfiTaskStore) -> u32 {
    catch_unwind(|| {
        if store.is_null() {
            return 0;
        }
        let store = unsafe { &*store };
        saturating_u32(store.inner.len())
    })
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a task with the trimmed `text`.
///
/// Returns a result with `error_code = Ok` and the created task, or
/// `EmptyText` when the text is blank, or `IdsExhausted` when a restored
/// store already holds id `UINT64_MAX`.
/// The caller must free the returned pointer with `tasklist_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_add_task(
    store: *mut FfiTaskStore,
    text: *const c_char,
) -> *mut FfiTaskResult {
    catch_unwind(|| {
        if store.is_null() {
            return FfiTaskResult::null_arg("store");
        }
        if text.is_null() {
            return FfiTaskResult::null_arg("text");
        }
        let store = unsafe { &mut *store };
        let text = unsafe { read_str(text) };
        match store.inner.add_task(&text) {
            Ok(task) => FfiTaskResult::ok_task(task),
            Err(e) => FfiTaskResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| {
        warn!("panic in tasklist_add_task");
        FfiTaskResult::panic("panic in tasklist_add_task")
    })
}

/// Delete a task. No-op for a null store or an absent id.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_delete_task(store: *mut FfiTaskStore, id: u64) {
    with_store(store, "tasklist_delete_task", |s| s.delete_task(TaskId::new(id)));
}

/// Flip the completion flag. No-op for a null store or an absent id.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_toggle_completed(store: *mut FfiTaskStore, id: u64) {
    with_store(store, "tasklist_toggle_completed", |s| {
        s.toggle_completed(TaskId::new(id))
    });
}

/// Flip the pin flag. No-op for a null store or an absent id.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_toggle_pin(store: *mut FfiTaskStore, id: u64) {
    with_store(store, "tasklist_toggle_pin", |s| s.toggle_pin(TaskId::new(id)));
}

/// Rename a task. Returns false when the trimmed text is blank, the id is
/// absent, or an argument is null; the previous text is kept in all those
/// cases.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_rename_task(
    store: *mut FfiTaskStore,
    id: u64,
    text: *const c_char,
) -> bool {
    if text.is_null() {
        return false;
    }
    with_store(store, "tasklist_rename_task", |s| {
        let text = unsafe { read_str(text) };
        s.rename_task(TaskId::new(id), &text)
    })
    .unwrap_or(false)
}

/// Run `f` against the store behind `store`, or return `None` if it is null
/// or `f` panicked.
fn with_store<R>(
    store: *mut FfiTaskStore,
    name: &str,
    f: impl FnOnce(&mut TaskStore) -> R,
) -> Option<R> {
    if store.is_null() {
        return None;
    }
    let outcome = catch_unwind(std::panic::AssertUnwindSafe(|| {
        let store = unsafe { &mut *store };
        f(&mut store.inner)
    }));
    match outcome {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(function = name, "panic caught at FFI boundary");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Build the pinned-first, numbered display list.
///
/// Returns null if `store` is null. An empty store yields a list with
/// `len = 0` and `items = NULL`.
/// The caller must free the returned pointer with `tasklist_free_display_list`.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_display_list(store: *const FfiTaskStore) -> *mut FfiDisplayList {
    catch_unwind(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        FfiDisplayList::from_core(store.inner.display_list())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Serialize the store's tasks (insertion order) as a JSON array.
///
/// Returns null if `store` is null.
/// The caller must free the returned string with `tasklist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_snapshot_json(store: *const FfiTaskStore) -> *mut c_char {
    catch_unwind(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        match serde_json::to_string(store.inner.tasks()) {
            Ok(json) => into_c_string(json),
            Err(e) => {
                warn!(error = %e, "snapshot serialization failed");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a result returned by `tasklist_add_task`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_free_result(result: *mut FfiTaskResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.task.is_null() {
            let task = unsafe { Box::from_raw(result.task) };
            free_ffi_task_fields(&task);
        }
    });
}

/// Free a list returned by `tasklist_display_list`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_free_display_list(list: *mut FfiDisplayList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let items: Box<[FfiDisplayItem]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    list.items,
                    list.len as usize,
                ))
            };
            for item in items.iter() {
                free_ffi_task_fields(&item.task);
            }
        }
    });
}

/// Free the C-string fields of an `FfiTask` (but not the struct itself).
fn free_ffi_task_fields(task: &FfiTask) {
    if !task.text.is_null() {
        drop(unsafe { CString::from_raw(task.text) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tasklist_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn add(store: *mut FfiTaskStore, text: &str) -> u64 {
        let text = CString::new(text).unwrap();
        let result = tasklist_add_task(store, text.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        let id = unsafe { &*result_ref.task }.id;
        tasklist_free_result(result);
        id
    }

    /// Read the display list as `(item_number, id, text)` rows.
    fn rows(store: *const FfiTaskStore) -> Vec<(u32, u64, String)> {
        let list = tasklist_display_list(store);
        assert!(!list.is_null());
        let list_ref = unsafe { &*list };
        let rows = if list_ref.len == 0 {
            assert!(list_ref.items.is_null());
            Vec::new()
        } else {
            let items = unsafe { std::slice::from_raw_parts(list_ref.items, list_ref.len as usize) };
            items
                .iter()
                .map(|i| {
                    let text = unsafe { CStr::from_ptr(i.task.text) }.to_str().unwrap().to_string();
                    (i.item_number, i.task.id, text)
                })
                .collect()
        };
        tasklist_free_display_list(list);
        rows
    }

    #[test]
    fn store_new_and_free() {
        let store = tasklist_store_new();
        assert!(!store.is_null());
        assert_eq!(tasklist_store_len(store), 0);
        tasklist_store_free(store);
    }

    #[test]
    fn store_free_null_is_safe() {
        tasklist_store_free(std::ptr::null_mut());
    }

    #[test]
    fn add_task_returns_trimmed_task() {
        let store = tasklist_store_new();
        let text = CString::new("  Buy milk ").unwrap();
        let result = tasklist_add_task(store, text.as_ptr());
        assert!(!result.is_null());

        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert!(result_ref.error_message.is_null());
        let task = unsafe { &*result_ref.task };
        assert_eq!(task.id, 1);
        let text = unsafe { CStr::from_ptr(task.text) }.to_str().unwrap();
        assert_eq!(text, "Buy milk");
        assert!(!task.completed);
        assert!(!task.pinned);

        tasklist_free_result(result);
        assert_eq!(tasklist_store_len(store), 1);
        tasklist_store_free(store);
    }

    #[test]
    fn add_blank_task_returns_empty_text() {
        let store = tasklist_store_new();
        let text = CString::new("   ").unwrap();
        let result = tasklist_add_task(store, text.as_ptr());

        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::EmptyText);
        assert!(result_ref.task.is_null());
        let msg = unsafe { CStr::from_ptr(result_ref.error_message) }.to_str().unwrap();
        assert_eq!(msg, "task text must not be blank");

        tasklist_free_result(result);
        assert_eq!(tasklist_store_len(store), 0);
        tasklist_store_free(store);
    }

    #[test]
    fn add_task_null_args_return_null_arg() {
        let text = CString::new("x").unwrap();
        let result = tasklist_add_task(std::ptr::null_mut(), text.as_ptr());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        tasklist_free_result(result);

        let store = tasklist_store_new();
        let result = tasklist_add_task(store, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        tasklist_free_result(result);
        tasklist_store_free(store);
    }

    #[test]
    fn toggle_pin_reorders_display_list() {
        let store = tasklist_store_new();
        add(store, "A");
        let b = add(store, "B");
        add(store, "C");

        tasklist_toggle_pin(store, b);
        assert_eq!(
            rows(store),
            vec![(1, 2, "B".into()), (2, 1, "A".into()), (3, 3, "C".into())]
        );
        tasklist_store_free(store);
    }

    #[test]
    fn toggle_completed_flips_flag() {
        let store = tasklist_store_new();
        let id = add(store, "Run");
        tasklist_toggle_completed(store, id);
        assert!(unsafe { &*store }.inner.get(TaskId::new(id)).unwrap().completed);
        tasklist_toggle_completed(store, id);
        assert!(!unsafe { &*store }.inner.get(TaskId::new(id)).unwrap().completed);
        tasklist_store_free(store);
    }

    #[test]
    fn rename_rejects_blank_and_keeps_text() {
        let store = tasklist_store_new();
        let id = add(store, "Old");

        let blank = CString::new(" ").unwrap();
        assert!(!tasklist_rename_task(store, id, blank.as_ptr()));
        assert!(!tasklist_rename_task(store, id, std::ptr::null()));
        assert_eq!(rows(store), vec![(1, id, "Old".into())]);

        let new = CString::new("  New  ").unwrap();
        assert!(tasklist_rename_task(store, id, new.as_ptr()));
        assert_eq!(rows(store), vec![(1, id, "New".into())]);
        tasklist_store_free(store);
    }

    #[test]
    fn delete_is_idempotent_and_missing_ids_are_ignored() {
        let store = tasklist_store_new();
        let a = add(store, "A");
        add(store, "B");

        tasklist_delete_task(store, a);
        tasklist_delete_task(store, a);
        tasklist_toggle_pin(store, 99);
        tasklist_toggle_completed(store, 99);
        assert_eq!(rows(store), vec![(1, 2, "B".into())]);
        tasklist_store_free(store);
    }

    #[test]
    fn mutations_on_null_store_are_safe() {
        tasklist_delete_task(std::ptr::null_mut(), 1);
        tasklist_toggle_pin(std::ptr::null_mut(), 1);
        tasklist_toggle_completed(std::ptr::null_mut(), 1);
        let text = CString::new("x").unwrap();
        assert!(!tasklist_rename_task(std::ptr::null_mut(), 1, text.as_ptr()));
        assert_eq!(tasklist_store_len(std::ptr::null()), 0);
        assert!(tasklist_display_list(std::ptr::null()).is_null());
        assert!(tasklist_snapshot_json(std::ptr::null()).is_null());
    }

    #[test]
    fn empty_display_list_has_null_items() {
        let store = tasklist_store_new();
        assert!(rows(store).is_empty());
        tasklist_store_free(store);
    }

    #[test]
    fn recently_pinned_store_orders_latest_pin_first() {
        let store = tasklist_store_new_with_pin_order(FfiPinOrder::RecentlyPinned);
        let a = add(store, "A");
        add(store, "B");
        let c = add(store, "C");
        tasklist_toggle_pin(store, a);
        tasklist_toggle_pin(store, c);
        assert_eq!(
            rows(store),
            vec![(1, c, "C".into()), (2, a, "A".into()), (3, 2, "B".into())]
        );
        tasklist_store_free(store);
    }

    #[test]
    fn snapshot_and_restore() {
        let store = tasklist_store_new();
        add(store, "A");
        let b = add(store, "B");
        tasklist_toggle_pin(store, b);

        let json = tasklist_snapshot_json(store);
        assert!(!json.is_null());

        let mut code = FfiErrorCode::Panic;
        let restored = tasklist_store_restore(json, FfiPinOrder::Insertion, &mut code);
        assert_eq!(code, FfiErrorCode::Ok);
        assert!(!restored.is_null());
        assert_eq!(rows(restored), rows(store));

        // New ids continue after the restored ones.
        assert_eq!(add(restored, "C"), 3);

        tasklist_free_string(json);
        tasklist_store_free(restored);
        tasklist_store_free(store);
    }

    #[test]
    fn restore_reports_errors() {
        let mut code = FfiErrorCode::Ok;

        let bad = CString::new("not json").unwrap();
        let store = tasklist_store_restore(bad.as_ptr(), FfiPinOrder::Insertion, &mut code);
        assert!(store.is_null());
        assert_eq!(code, FfiErrorCode::Deserialization);

        let dup = CString::new(r#"[{"id":1,"text":"A"},{"id":1,"text":"B"}]"#).unwrap();
        let store = tasklist_store_restore(dup.as_ptr(), FfiPinOrder::Insertion, &mut code);
        assert!(store.is_null());
        assert_eq!(code, FfiErrorCode::DuplicateId);

        let blank = CString::new(r#"[{"id":1,"text":"  "}]"#).unwrap();
        let store = tasklist_store_restore(blank.as_ptr(), FfiPinOrder::Insertion, &mut code);
        assert!(store.is_null());
        assert_eq!(code, FfiErrorCode::EmptyText);

        let store = tasklist_store_restore(std::ptr::null(), FfiPinOrder::Insertion, &mut code);
        assert!(store.is_null());
        assert_eq!(code, FfiErrorCode::NullArg);

        // A null out-pointer is allowed.
        let store = tasklist_store_restore(bad.as_ptr(), FfiPinOrder::Insertion, std::ptr::null_mut());
        assert!(store.is_null());
    }

    #[test]
    fn add_after_restoring_max_id_reports_ids_exhausted() {
        let json = CString::new(format!(
            r#"[{{"id":0,"text":"Zero"}},{{"id":{},"text":"Max"}}]"#,
            u64::MAX
        ))
        .unwrap();
        let mut code = FfiErrorCode::Panic;
        let store = tasklist_store_restore(json.as_ptr(), FfiPinOrder::Insertion, &mut code);
        assert_eq!(code, FfiErrorCode::Ok);

        let text = CString::new("new").unwrap();
        let result = tasklist_add_task(store, text.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::IdsExhausted);
        assert!(result_ref.task.is_null());
        tasklist_free_result(result);

        assert_eq!(tasklist_store_len(store), 2);
        tasklist_store_free(store);
    }

    #[test]
    fn free_functions_accept_null() {
        tasklist_free_result(std::ptr::null_mut());
        tasklist_free_display_list(std::ptr::null_mut());
        tasklist_free_string(std::ptr::null_mut());
    }
}
