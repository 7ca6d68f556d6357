//! Ordering
//!
//! Turns "task X was dropped into column S at index i" into the full list
//! of `(id, status, order)` changes for the columns involved.

use crate::domain::{DomainResult, TaskId, TaskStatus};
use crate::store::TaskStore;

/// New placement of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAssignment {
    pub id: TaskId,
    pub status: TaskStatus,
    pub order: u32,
}

/// Outcome of a drop, ready to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Only the tasks whose status or order actually changes
    pub assignments: Vec<OrderAssignment>,
}

impl MovePlan {
    pub fn is_noop(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn status_changed(&self) -> bool {
        self.from != self.to
    }

    /// Placement of the dragged task itself
    pub fn moved(&self) -> Option<&OrderAssignment> {
        self.assignments.iter().find(|a| a.id == self.task_id)
    }
}

/// Plan moving `id` into `target` at `index`.
///
/// `index` counts the target column's tasks without the moved one, which is
/// how the placeholder position is measured while dragging. Indices past
/// the end append.
pub fn plan_move(
    store: &TaskStore,
    id: &TaskId,
    target: TaskStatus,
    index: usize,
) -> DomainResult<MovePlan> {
    let from = store.find_by_id(id)?.status;

    let mut target_ids: Vec<TaskId> = store
        .column_ids(target)
        .into_iter()
        .filter(|other| other != id)
        .collect();
    let index = index.min(target_ids.len());
    target_ids.insert(index, id.clone());

    let mut layout = vec![(target, target_ids)];
    if from != target {
        let origin_ids = store
            .column_ids(from)
            .into_iter()
            .filter(|other| other != id)
            .collect();
        layout.push((from, origin_ids));
    }

    let mut assignments = Vec::new();
    for (status, ids) in layout {
        for (order, task_id) in ids.into_iter().enumerate() {
            let order = order as u32;
            let current = store.find_by_id(&task_id)?;
            if current.status != status || current.order != order {
                assignments.push(OrderAssignment { id: task_id, status, order });
            }
        }
    }

    Ok(MovePlan {
        task_id: id.clone(),
        from,
        to: target,
        assignments,
    })
}
