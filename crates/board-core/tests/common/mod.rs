//! Shared fakes for board-core integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use async_trait::async_trait;
use board_core::{DomainError, DomainResult, RemotePersistence, StatusSink, SyncEvent, Task, TaskId, TaskStatus};

/// In-memory remote collection that records every write
#[derive(Default)]
pub struct FakeRemote {
    pub records: RefCell<BTreeMap<TaskId, Task>>,
    pub puts: RefCell<Vec<Task>>,
    pub deletes: RefCell<Vec<TaskId>>,
    pub posts: Cell<u32>,
    pub offline: Cell<bool>,
}

impl FakeRemote {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let remote = Self::default();
        for task in tasks {
            remote.records.borrow_mut().insert(task.id.clone(), task);
        }
        remote
    }

    fn online(&self) -> DomainResult<()> {
        if self.offline.get() {
            return Err(DomainError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl RemotePersistence<Task> for FakeRemote {
    async fn create(&self, entity: &Task) -> DomainResult<TaskId> {
        self.online()?;
        let n = self.posts.get() + 1;
        self.posts.set(n);
        let id = TaskId::new(format!("-N{}", n));
        let mut stored = entity.clone();
        stored.id = id.clone();
        self.records.borrow_mut().insert(id.clone(), stored);
        Ok(id)
    }

    async fn list(&self) -> DomainResult<Vec<Task>> {
        self.online()?;
        Ok(self.records.borrow().values().cloned().collect())
    }

    async fn update(&self, entity: &Task) -> DomainResult<()> {
        self.online()?;
        self.puts.borrow_mut().push(entity.clone());
        self.records.borrow_mut().insert(entity.id.clone(), entity.clone());
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> DomainResult<()> {
        self.online()?;
        self.deletes.borrow_mut().push(id.clone());
        self.records.borrow_mut().remove(id);
        Ok(())
    }
}

/// Sink that keeps every event
#[derive(Default)]
pub struct RecordingSink {
    pub events: RefCell<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn failures(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SyncEvent::Failed { .. }))
            .count()
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, event: SyncEvent) {
        self.events.borrow_mut().push(event);
    }
}

pub fn task(id: &str, status: TaskStatus, order: u32) -> Task {
    Task::new(format!("Task {}", id), status).with_id(id).with_order(order)
}
