//! Task Store
//!
//! In-memory collection of the board's tasks, the source of truth for
//! rendering. Orders are kept contiguous (0, 1, 2, ...) inside every
//! status column after each mutation.

use std::collections::{BTreeMap, HashSet};

use crate::cache::{SnapshotEntry, StatusSnapshot};
use crate::domain::{DomainError, DomainResult, SubtaskProgress, Task, TaskId, TaskStatus};
use crate::ordering::OrderAssignment;
use crate::remote::RemotePersistence;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace(tasks);
        store
    }

    /// Replace the whole collection with what the remote store holds
    pub async fn load<R>(&mut self, remote: &R) -> DomainResult<&[Task]>
    where
        R: RemotePersistence<Task> + ?Sized,
    {
        let tasks = remote.list().await?;
        tracing::debug!(count = tasks.len(), "loaded tasks");
        self.replace(tasks);
        Ok(&self.tasks)
    }

    /// Replace the collection and normalize orders
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        for status in TaskStatus::ALL {
            self.reindex(status);
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn find_by_id(&self, id: &TaskId) -> DomainResult<&Task> {
        self.tasks
            .iter()
            .find(|task| &task.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", id)))
    }

    fn find_mut(&mut self, id: &TaskId) -> DomainResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", id)))
    }

    /// Replace a task by id, or append it. Never talks to the remote store.
    pub fn upsert_local(&mut self, task: Task) {
        let status = task.status;
        if let Some(index) = self.tasks.iter().position(|t| t.id == task.id) {
            let previous = std::mem::replace(&mut self.tasks[index], task).status;
            if previous != status {
                self.reindex(previous);
            }
        } else {
            let mut task = task;
            if self.column(status).iter().any(|t| t.order == task.order) {
                task.order = self.next_order(status);
            }
            self.tasks.push(task);
        }
        self.reindex(status);
    }

    /// Remove a task from memory only
    pub fn remove_local(&mut self, id: &TaskId) -> DomainResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", id)))?;
        let removed = self.tasks.remove(index);
        self.reindex(removed.status);
        Ok(removed)
    }

    /// Tasks of one column, by order
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        let mut column: Vec<&Task> = self.tasks.iter().filter(|t| t.status == status).collect();
        column.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        column
    }

    pub fn column_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.column(status).into_iter().map(|t| t.id.clone()).collect()
    }

    /// All four columns in board order
    pub fn grouped(&self) -> Vec<(TaskStatus, Vec<&Task>)> {
        TaskStatus::ALL
            .into_iter()
            .map(|status| (status, self.column(status)))
            .collect()
    }

    /// Order a new task appended to `status` would get
    pub fn next_order(&self, status: TaskStatus) -> u32 {
        self.tasks.iter().filter(|t| t.status == status).count() as u32
    }

    /// Rewrite status and order of every listed task to match the given
    /// per-column sequence. Unknown ids are ignored; tasks that are not
    /// listed keep their column and follow the listed ones.
    ///
    /// Returns the assignments that changed something.
    pub fn rebuild_from_presentation_order(
        &mut self,
        ordered_ids_by_status: &BTreeMap<TaskStatus, Vec<TaskId>>,
    ) -> Vec<OrderAssignment> {
        let known: HashSet<&TaskId> = self.tasks.iter().map(|t| &t.id).collect();
        let mut listed: HashSet<TaskId> = HashSet::new();
        let mut columns: BTreeMap<TaskStatus, Vec<TaskId>> = BTreeMap::new();

        for (status, ids) in ordered_ids_by_status {
            let column = columns.entry(*status).or_default();
            for id in ids {
                if known.contains(id) && listed.insert(id.clone()) {
                    column.push(id.clone());
                }
            }
        }

        let mut assignments = Vec::new();
        for status in TaskStatus::ALL {
            let mut ids = columns.remove(&status).unwrap_or_default();
            ids.extend(
                self.column_ids(status)
                    .into_iter()
                    .filter(|id| !listed.contains(id)),
            );
            for (order, id) in ids.into_iter().enumerate() {
                assignments.push(OrderAssignment { id, status, order: order as u32 });
            }
        }

        self.apply_ordering(&assignments)
    }

    /// Apply explicit placements. Returns the ones that changed a task.
    pub fn apply_ordering(&mut self, assignments: &[OrderAssignment]) -> Vec<OrderAssignment> {
        let mut touched: HashSet<TaskStatus> = HashSet::new();
        let mut changed = Vec::new();

        for assignment in assignments {
            let Ok(task) = self.find_mut(&assignment.id) else {
                tracing::debug!(task_id = %assignment.id, "ignoring placement of unknown task");
                continue;
            };
            if task.status != assignment.status || task.order != assignment.order {
                touched.insert(task.status);
                touched.insert(assignment.status);
                task.status = assignment.status;
                task.order = assignment.order;
                changed.push(assignment.clone());
            }
        }

        for status in touched {
            self.reindex(status);
        }
        changed
    }

    /// Status and order of every task, for the local cache
    pub fn snapshot(&self) -> StatusSnapshot {
        self.tasks
            .iter()
            .map(|t| (t.id.clone(), SnapshotEntry { status: t.status, order: Some(t.order) }))
            .collect()
    }

    /// Override statuses and orders from a cached snapshot.
    /// Entries for tasks no longer present are skipped.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) -> usize {
        let assignments: Vec<OrderAssignment> = snapshot
            .iter()
            .map(|(id, entry)| OrderAssignment {
                id: id.clone(),
                status: entry.status,
                order: entry.order.unwrap_or(u32::MAX),
            })
            .collect();
        self.apply_ordering(&assignments).len()
    }

    /// Flip one subtask of one task
    pub fn toggle_subtask(&mut self, id: &TaskId, index: usize) -> DomainResult<SubtaskProgress> {
        let task = self.find_mut(id)?;
        task.toggle_subtask(index)?;
        Ok(task.progress())
    }

    /// Renumber a column 0..n, stable on (order, id)
    fn reindex(&mut self, status: TaskStatus) {
        let mut indices: Vec<usize> = (0..self.tasks.len())
            .filter(|&i| self.tasks[i].status == status)
            .collect();
        indices.sort_by(|&a, &b| {
            let (a, b) = (&self.tasks[a], &self.tasks[b]);
            a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))
        });
        for (order, i) in indices.into_iter().enumerate() {
            self.tasks[i].order = order as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: TaskStatus, order: u32) -> Task {
        Task::new(format!("Task {}", id), status).with_id(id).with_order(order)
    }

    fn orders(store: &TaskStore, status: TaskStatus) -> Vec<(String, u32)> {
        store
            .column(status)
            .into_iter()
            .map(|t| (t.id.to_string(), t.order))
            .collect()
    }

    #[test]
    fn test_replace_normalizes_orders() {
        let store = TaskStore::from_tasks(vec![
            task("b", TaskStatus::ToDo, 7),
            task("a", TaskStatus::ToDo, 3),
            task("c", TaskStatus::ToDo, 3),
        ]);
        assert_eq!(
            orders(&store, TaskStatus::ToDo),
            vec![("a".to_string(), 0), ("c".to_string(), 1), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_upsert_replaces_and_appends() {
        let mut store = TaskStore::from_tasks(vec![task("a", TaskStatus::ToDo, 0)]);
        store.upsert_local(task("b", TaskStatus::ToDo, 0));
        assert_eq!(store.find_by_id(&"b".into()).unwrap().order, 1);

        let mut edited = store.find_by_id(&"a".into()).unwrap().clone();
        edited.title = "Renamed".to_string();
        store.upsert_local(edited);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id(&"a".into()).unwrap().title, "Renamed");
    }

    #[test]
    fn test_upsert_moving_column_closes_gap() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", TaskStatus::ToDo, 0),
            task("b", TaskStatus::ToDo, 1),
        ]);
        let mut moved = store.find_by_id(&"a".into()).unwrap().clone();
        moved.status = TaskStatus::Done;
        store.upsert_local(moved);
        assert_eq!(orders(&store, TaskStatus::ToDo), vec![("b".to_string(), 0)]);
        assert_eq!(orders(&store, TaskStatus::Done), vec![("a".to_string(), 0)]);
    }

    #[test]
    fn test_remove_local_reindexes() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", TaskStatus::ToDo, 0),
            task("b", TaskStatus::ToDo, 1),
            task("c", TaskStatus::ToDo, 2),
        ]);
        let removed = store.remove_local(&"a".into()).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(
            orders(&store, TaskStatus::ToDo),
            vec![("b".to_string(), 0), ("c".to_string(), 1)]
        );
        assert!(store.remove_local(&"a".into()).is_err());
    }

    #[test]
    fn test_rebuild_from_presentation_order() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", TaskStatus::ToDo, 0),
            task("b", TaskStatus::ToDo, 1),
            task("c", TaskStatus::Done, 0),
        ]);
        let mut layout = BTreeMap::new();
        layout.insert(TaskStatus::ToDo, vec![TaskId::from("b")]);
        layout.insert(TaskStatus::Done, vec!["c".into(), "a".into(), "ghost".into()]);

        let changed = store.rebuild_from_presentation_order(&layout);
        assert_eq!(changed.len(), 2);
        assert_eq!(orders(&store, TaskStatus::ToDo), vec![("b".to_string(), 0)]);
        assert_eq!(
            orders(&store, TaskStatus::Done),
            vec![("c".to_string(), 0), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_rebuild_appends_unlisted_tasks() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", TaskStatus::InProgress, 0),
            task("b", TaskStatus::InProgress, 1),
            task("x", TaskStatus::InProgress, 2),
            task("c", TaskStatus::Done, 0),
        ]);
        let mut layout = BTreeMap::new();
        layout.insert(TaskStatus::InProgress, vec![TaskId::from("x"), "a".into()]);

        store.rebuild_from_presentation_order(&layout);
        let b = store.find_by_id(&"b".into()).unwrap();
        assert_eq!(b.status, TaskStatus::InProgress);
        assert_eq!(
            orders(&store, TaskStatus::InProgress),
            vec![("x".to_string(), 0), ("a".to_string(), 1), ("b".to_string(), 2)]
        );
        assert_eq!(orders(&store, TaskStatus::Done), vec![("c".to_string(), 0)]);
    }

    #[test]
    fn test_snapshot_round_trip_ignores_stale_entries() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", TaskStatus::ToDo, 0),
            task("b", TaskStatus::ToDo, 1),
        ]);
        let mut snapshot = store.snapshot();
        snapshot.insert("a".into(), SnapshotEntry { status: TaskStatus::Done, order: Some(0) });
        snapshot.insert("deleted".into(), SnapshotEntry { status: TaskStatus::Done, order: Some(1) });

        assert_eq!(store.apply_snapshot(&snapshot), 1);
        assert_eq!(store.find_by_id(&"a".into()).unwrap().status, TaskStatus::Done);
        assert_eq!(orders(&store, TaskStatus::ToDo), vec![("b".to_string(), 0)]);
    }

    #[test]
    fn test_toggle_subtask_touches_only_that_subtask() {
        let mut a = task("a", TaskStatus::ToDo, 0);
        a.subtasks = vec![crate::domain::Subtask::new("x"), crate::domain::Subtask::new("y")];
        let b = task("b", TaskStatus::ToDo, 1);
        let mut store = TaskStore::from_tasks(vec![a, b.clone()]);

        let progress = store.toggle_subtask(&"a".into(), 1).unwrap();
        assert_eq!((progress.completed, progress.total), (1, 2));
        let a = store.find_by_id(&"a".into()).unwrap();
        assert!(!a.subtasks[0].completed);
        assert!(a.subtasks[1].completed);
        assert_eq!(store.find_by_id(&"b".into()).unwrap(), &b);
    }
}
