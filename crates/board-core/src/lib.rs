//! Kanban Board Core
//!
//! Layered the same way on both sides of the network:
//! - domain: entities and errors
//! - store / ordering: the in-memory board and drop planning
//! - cache / remote: the two persistence paths
//! - sync: commits changes and reports outcomes

pub mod domain;
pub mod store;
pub mod ordering;
pub mod cache;
pub mod remote;
pub mod sync;
pub mod summary;
pub mod config;

pub use cache::{LocalCache, MemoryCache, SnapshotEntry, StatusSnapshot};
pub use config::BoardConfig;
pub use domain::{
    Contact, DomainError, DomainResult, Entity, Priority, Subtask, SubtaskProgress, Task, TaskId,
    TaskStatus,
};
pub use ordering::{plan_move, MovePlan, OrderAssignment};
pub use remote::{RemotePersistence, RestRepository};
pub use store::TaskStore;
pub use summary::BoardSummary;
pub use sync::{Commit, LogSink, PersistPath, StatusSink, SyncCoordinator, SyncEvent};
