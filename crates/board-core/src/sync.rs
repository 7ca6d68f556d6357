//! Sync Coordinator
//!
//! Commits drops and edits into the TaskStore and persists them, either as
//! a full status snapshot in the local cache or as a remote write of the
//! single changed task. The two paths are exclusive per commit.
//!
//! Local state advances optimistically. Persistence failures are returned
//! to the caller and reported to the `StatusSink`; nothing is retried.

use std::rc::Rc;

use crate::cache::{LocalCache, StatusSnapshot};
use crate::domain::{DomainError, DomainResult, Task, TaskId};
use crate::ordering::MovePlan;
use crate::remote::RemotePersistence;
use crate::store::TaskStore;

/// Where a change was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPath {
    LocalCache,
    Remote,
}

/// Notifications for the status bar
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Saved { task_id: TaskId, path: PersistPath },
    Created { task_id: TaskId },
    Deleted { task_id: TaskId },
    Restored { applied: usize },
    Failed { task_id: Option<TaskId>, error: DomainError },
}

/// Receives sync outcomes
pub trait StatusSink {
    fn report(&self, event: SyncEvent);
}

/// Sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn report(&self, event: SyncEvent) {
        tracing::info!(?event, "sync");
    }
}

/// Result of the synchronous half of a commit
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// Nothing moved, nothing to write
    NoOp,
    /// Snapshot already written to the local cache
    Cached { task_id: TaskId },
    /// Store updated; the moved task still has to be written remotely
    Remote(Task),
}

#[derive(Clone)]
pub struct SyncCoordinator {
    remote: Rc<dyn RemotePersistence<Task>>,
    cache: Option<Rc<dyn LocalCache>>,
    sink: Rc<dyn StatusSink>,
    snapshot_key: String,
}

impl SyncCoordinator {
    pub fn new(remote: Rc<dyn RemotePersistence<Task>>, sink: Rc<dyn StatusSink>) -> Self {
        Self {
            remote,
            cache: None,
            sink,
            snapshot_key: crate::config::DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }

    /// Enable the local snapshot path
    pub fn with_cache(mut self, cache: Rc<dyn LocalCache>, snapshot_key: impl Into<String>) -> Self {
        self.cache = Some(cache);
        self.snapshot_key = snapshot_key.into();
        self
    }

    /// The cache, if configured and currently writable
    fn usable_cache(&self) -> Option<&dyn LocalCache> {
        let cache = self.cache.as_deref()?;
        match cache.probe() {
            Ok(()) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "local cache unavailable, using remote");
                None
            }
        }
    }

    fn fail<T>(&self, task_id: Option<&TaskId>, error: DomainError) -> DomainResult<T> {
        tracing::error!(task_id = ?task_id.map(TaskId::as_str), error = %error, "sync failed");
        self.sink.report(SyncEvent::Failed {
            task_id: task_id.cloned(),
            error: error.clone(),
        });
        Err(error)
    }

    /// Apply a drop to the store and write it locally if possible.
    ///
    /// A plan for a task that is no longer in the store is dropped with
    /// `NotFound`.
    pub fn commit(&self, store: &mut TaskStore, plan: &MovePlan) -> DomainResult<Commit> {
        if let Err(e) = store.find_by_id(&plan.task_id) {
            return self.fail(Some(&plan.task_id), e);
        }
        if plan.is_noop() {
            tracing::debug!(task_id = %plan.task_id, "drop in place, nothing to commit");
            return Ok(Commit::NoOp);
        }

        store.apply_ordering(&plan.assignments);
        tracing::info!(task_id = %plan.task_id, from = %plan.from, to = %plan.to, "committed move");

        if let Some(cache) = self.usable_cache() {
            match store.snapshot().save(cache, &self.snapshot_key) {
                Ok(()) => {
                    self.sink.report(SyncEvent::Saved {
                        task_id: plan.task_id.clone(),
                        path: PersistPath::LocalCache,
                    });
                    return Ok(Commit::Cached { task_id: plan.task_id.clone() });
                }
                Err(e) => tracing::warn!(error = %e, "snapshot write failed, using remote"),
            }
        }

        let task = store.find_by_id(&plan.task_id)?.clone();
        Ok(Commit::Remote(task))
    }

    /// Finish a commit: issue the remote write it staged, if any
    pub async fn persist(&self, commit: Commit) -> DomainResult<()> {
        match commit {
            Commit::NoOp | Commit::Cached { .. } => Ok(()),
            Commit::Remote(task) => self.save_task(&task).await,
        }
    }

    /// Write one task's full record
    pub async fn save_task(&self, task: &Task) -> DomainResult<()> {
        match self.remote.update(task).await {
            Ok(()) => {
                self.sink.report(SyncEvent::Saved {
                    task_id: task.id.clone(),
                    path: PersistPath::Remote,
                });
                Ok(())
            }
            Err(e) => self.fail(Some(&task.id), e),
        }
    }

    /// Read all tasks from the remote store
    pub async fn fetch_tasks(&self) -> DomainResult<Vec<Task>> {
        match self.remote.list().await {
            Ok(tasks) => Ok(tasks),
            Err(e) => self.fail(None, e),
        }
    }

    /// Apply the cached snapshot over freshly loaded tasks
    pub fn restore(&self, store: &mut TaskStore) -> usize {
        let Some(cache) = self.usable_cache() else {
            return 0;
        };
        match StatusSnapshot::load(cache, &self.snapshot_key) {
            Ok(Some(snapshot)) => {
                let applied = store.apply_snapshot(&snapshot);
                tracing::debug!(applied, entries = snapshot.len(), "restored status snapshot");
                self.sink.report(SyncEvent::Restored { applied });
                applied
            }
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable status snapshot");
                0
            }
        }
    }

    /// POST a new task. The draft should already carry its column order.
    pub async fn create_task(&self, draft: Task) -> DomainResult<Task> {
        if draft.title.trim().is_empty() {
            return self.fail(None, DomainError::InvalidInput("task title is empty".to_string()));
        }
        match self.remote.create(&draft).await {
            Ok(id) => {
                let mut task = draft;
                task.id = id;
                tracing::info!(task_id = %task.id, "created task");
                self.sink.report(SyncEvent::Created { task_id: task.id.clone() });
                Ok(task)
            }
            Err(e) => self.fail(None, e),
        }
    }

    /// Flip a subtask in the store, returns the task to save
    pub fn toggle_subtask(&self, store: &mut TaskStore, id: &TaskId, index: usize) -> DomainResult<Task> {
        match store.toggle_subtask(id, index) {
            Ok(progress) => {
                tracing::debug!(task_id = %id, index, completed = progress.completed, "toggled subtask");
                Ok(store.find_by_id(id)?.clone())
            }
            Err(e) => self.fail(Some(id), e),
        }
    }

    /// Drop a task from the store and from the cached snapshot
    pub fn forget_local(&self, store: &mut TaskStore, id: &TaskId) -> DomainResult<Task> {
        let removed = match store.remove_local(id) {
            Ok(task) => task,
            Err(e) => return self.fail(Some(id), e),
        };
        if let Some(cache) = self.usable_cache() {
            if let Ok(Some(mut snapshot)) = StatusSnapshot::load(cache, &self.snapshot_key) {
                if snapshot.remove(id).is_some() {
                    if let Err(e) = snapshot.save(cache, &self.snapshot_key) {
                        tracing::warn!(error = %e, "failed to prune status snapshot");
                    }
                }
            }
        }
        Ok(removed)
    }

    /// Remote DELETE of a task
    pub async fn delete_task(&self, id: &TaskId) -> DomainResult<()> {
        match self.remote.delete(id).await {
            Ok(()) => {
                tracing::info!(task_id = %id, "deleted task");
                self.sink.report(SyncEvent::Deleted { task_id: id.clone() });
                Ok(())
            }
            Err(e) => self.fail(Some(id), e),
        }
    }
}
