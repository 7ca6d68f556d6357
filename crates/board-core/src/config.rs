//! Board Configuration
//!
//! Every field has a default, so a partial JSON document is valid.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const DEFAULT_SNAPSHOT_KEY: &str = "kanban.statusSnapshot";

fn default_remote_url() -> String {
    option_env!("KANBAN_REMOTE_URL")
        .unwrap_or("http://localhost:9000")
        .to_string()
}

fn default_tasks_collection() -> String {
    "tasks".to_string()
}

fn default_contacts_collection() -> String {
    "contacts".to_string()
}

fn default_true() -> bool {
    true
}

fn default_snapshot_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

fn default_drop_grace_ms() -> u32 {
    100
}

fn default_settle_ms() -> u32 {
    400
}

fn default_log_capacity() -> usize {
    200
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    /// Root of the document store, without trailing `.json`
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    #[serde(default = "default_tasks_collection")]
    pub tasks_collection: String,
    #[serde(default = "default_contacts_collection")]
    pub contacts_collection: String,
    /// Persist drops as a local snapshot when storage is writable
    #[serde(default = "default_true")]
    pub use_local_cache: bool,
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
    /// Wait for a drop after dragend before cancelling
    #[serde(default = "default_drop_grace_ms")]
    pub drop_grace_ms: u32,
    /// Length of the dropped-card transition
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u32,
    /// Recent log lines kept in memory
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            tasks_collection: default_tasks_collection(),
            contacts_collection: default_contacts_collection(),
            use_local_cache: true,
            snapshot_key: default_snapshot_key(),
            drop_grace_ms: default_drop_grace_ms(),
            settle_ms: default_settle_ms(),
            log_capacity: default_log_capacity(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        let config: BoardConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.remote_url.starts_with("http://") || self.remote_url.starts_with("https://")) {
            return Err(DomainError::InvalidInput(format!(
                "remoteUrl must be http(s), got '{}'",
                self.remote_url
            )));
        }
        if self.tasks_collection.is_empty() || self.contacts_collection.is_empty() {
            return Err(DomainError::InvalidInput("collection names must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = BoardConfig::from_json(r#"{"remoteUrl":"https://x.example.com","useLocalCache":false}"#).unwrap();
        assert_eq!(config.remote_url, "https://x.example.com");
        assert!(!config.use_local_cache);
        assert_eq!(config.tasks_collection, "tasks");
        assert_eq!(config.drop_grace_ms, 100);
        assert_eq!(config.settle_ms, 400);
        assert_eq!(config.snapshot_key, DEFAULT_SNAPSHOT_KEY);
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = BoardConfig::from_json(r#"{"remoteUrl":"ftp://nope"}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(BoardConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_default_is_valid() {
        BoardConfig::default().validate().unwrap();
    }
}
