//! Board Summary
//!
//! Dashboard counters derived from the store.

use chrono::NaiveDate;

use crate::domain::{Priority, TaskStatus};
use crate::store::TaskStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSummary {
    pub total: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    /// Urgent tasks not yet done
    pub urgent: usize,
    /// Earliest due date of an open urgent task, today or later
    pub next_urgent_deadline: Option<NaiveDate>,
}

impl BoardSummary {
    pub fn from_store(store: &TaskStore, today: NaiveDate) -> Self {
        let mut summary = BoardSummary {
            total: store.len(),
            ..Default::default()
        };
        for task in store.iter() {
            match task.status {
                TaskStatus::ToDo => summary.to_do += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::AwaitFeedback => summary.await_feedback += 1,
                TaskStatus::Done => summary.done += 1,
            }
            if task.priority == Priority::Urgent && task.status != TaskStatus::Done {
                summary.urgent += 1;
                if let Some(due) = task.due_date.filter(|d| *d >= today) {
                    summary.next_urgent_deadline = Some(match summary.next_urgent_deadline {
                        Some(current) => current.min(due),
                        None => due,
                    });
                }
            }
        }
        summary
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::AwaitFeedback => self.await_feedback,
            TaskStatus::Done => self.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn urgent(id: &str, status: TaskStatus, due: Option<NaiveDate>) -> Task {
        let mut task = Task::new(id, status).with_id(id);
        task.priority = Priority::Urgent;
        task.due_date = due;
        task
    }

    #[test]
    fn test_counts_and_deadline() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let store = TaskStore::from_tasks(vec![
            urgent("a", TaskStatus::ToDo, NaiveDate::from_ymd_opt(2024, 6, 20)),
            urgent("b", TaskStatus::InProgress, NaiveDate::from_ymd_opt(2024, 6, 12)),
            urgent("c", TaskStatus::Done, NaiveDate::from_ymd_opt(2024, 6, 11)),
            urgent("d", TaskStatus::ToDo, NaiveDate::from_ymd_opt(2024, 6, 1)),
            Task::new("e", TaskStatus::AwaitFeedback).with_id("e"),
        ]);

        let summary = BoardSummary::from_store(&store, today);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.count(TaskStatus::ToDo), 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.await_feedback, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.urgent, 3);
        assert_eq!(summary.next_urgent_deadline, NaiveDate::from_ymd_opt(2024, 6, 12));
    }

    #[test]
    fn test_empty_board() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(BoardSummary::from_store(&TaskStore::new(), today), BoardSummary::default());
    }
}
