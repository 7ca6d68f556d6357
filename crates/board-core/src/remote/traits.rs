//! Remote Persistence - Core Traits
//!
//! Defines the abstract interface to a remote collection.
//! Implementations can use HTTP, in-memory fakes, etc.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity};

/// CRUD over one remote collection
///
/// Generic over any Entity type. Futures are not `Send`: the board runs on
/// the browser's single thread.
#[async_trait(?Send)]
pub trait RemotePersistence<T: Entity> {
    /// Store a new record, returns the key the store generated
    async fn create(&self, entity: &T) -> DomainResult<T::Id>;

    /// All records of the collection
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Overwrite the record stored under the entity's id
    async fn update(&self, entity: &T) -> DomainResult<()>;

    async fn delete(&self, id: &T::Id) -> DomainResult<()>;
}
