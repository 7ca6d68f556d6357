//! Domain Layer - Core Entity Trait
//!
//! Every record kept in the remote document store has a key assigned by
//! the store and a JSON body.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Core trait for all records persisted in a remote collection
pub trait Entity: Sized + Clone + Serialize + DeserializeOwned {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + AsRef<str> + From<String>;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;

    /// Stores the key the remote store generated for this record.
    fn assign_id(&mut self, id: Self::Id);
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Fetch rejected or the remote answered with a non-2xx status
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// The local key/value store failed its probe or refused a write
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::NotFound("task abc".to_string());
        assert_eq!(err.to_string(), "Not found: task abc");
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: DomainError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DomainError::Serialization(_)));
    }
}
