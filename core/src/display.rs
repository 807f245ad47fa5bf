//! Display-order derivation.
//!
//! The list is recomputed from the insertion-ordered sequence on every read:
//! a stable partition into pinned and unpinned tasks, then 1-based numbering.
//! Nothing here is cached, so numbering cannot drift after deletes or pins.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::config::PinOrder;
use crate::types::{DisplayItem, Task, TaskId};

/// Build the numbered, pinned-first view of `tasks`.
///
/// `tasks` must be in insertion order. `pin_stamps` maps each pinned task to
/// the sequence number of its latest pin and is only consulted for
/// `PinOrder::RecentlyPinned`.
pub fn display_order(
    tasks: &[Task],
    pin_stamps: &HashMap<TaskId, u64>,
    pin_order: PinOrder,
) -> Vec<DisplayItem> {
    let (mut pinned, unpinned): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|t| t.pinned);

    if pin_order == PinOrder::RecentlyPinned {
        // Stable sort: equal stamps fall back to insertion order.
        pinned.sort_by_key(|t| Reverse(pin_stamps.get(&t.id).copied().unwrap_or(0)));
    }

    pinned
        .into_iter()
        .chain(unpinned)
        .enumerate()
        .map(|(index, task)| DisplayItem {
            item_number: index + 1,
            task: task.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, pinned: bool) -> Task {
        Task {
            id: TaskId::new(id),
            text: format!("task {id}"),
            completed: false,
            pinned,
        }
    }

    fn ids(items: &[DisplayItem]) -> Vec<u64> {
        items.iter().map(|i| i.task.id.get()).collect()
    }

    #[test]
    fn empty_sequence_gives_empty_view() {
        assert!(display_order(&[], &HashMap::new(), PinOrder::Insertion).is_empty());
    }

    #[test]
    fn pinned_tasks_come_first_in_insertion_order() {
        let tasks = vec![task(1, false), task(2, true), task(3, false), task(4, true)];
        let view = display_order(&tasks, &HashMap::new(), PinOrder::Insertion);
        assert_eq!(ids(&view), vec![2, 4, 1, 3]);
        let numbers: Vec<usize> = view.iter().map(|i| i.item_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn recently_pinned_orders_pinned_group_by_stamp() {
        let tasks = vec![task(1, true), task(2, false), task(3, true), task(4, true)];
        let stamps = HashMap::from([
            (TaskId::new(1), 5),
            (TaskId::new(3), 2),
            (TaskId::new(4), 9),
        ]);
        let view = display_order(&tasks, &stamps, PinOrder::RecentlyPinned);
        assert_eq!(ids(&view), vec![4, 1, 3, 2]);
    }

    #[test]
    fn insertion_order_ignores_stamps() {
        let tasks = vec![task(1, true), task(2, true)];
        let stamps = HashMap::from([(TaskId::new(1), 1), (TaskId::new(2), 2)]);
        let view = display_order(&tasks, &stamps, PinOrder::Insertion);
        assert_eq!(ids(&view), vec![1, 2]);
    }

    #[test]
    fn unpinned_group_never_reordered() {
        let tasks = vec![task(3, false), task(1, false), task(2, false)];
        let view = display_order(&tasks, &HashMap::new(), PinOrder::RecentlyPinned);
        assert_eq!(ids(&view), vec![3, 1, 2]);
    }
}
