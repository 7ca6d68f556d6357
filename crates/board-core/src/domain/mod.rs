//! Domain Layer
//!
//! Board entities and core abstractions.
//! Nothing here talks to the network or the browser.

mod entity;
mod task;
mod contact;

pub use entity::{Entity, DomainError, DomainResult};
pub use task::{Task, TaskId, TaskStatus, Priority, Subtask, SubtaskProgress};
pub use contact::Contact;
