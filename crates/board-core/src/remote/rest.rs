//! REST Repository
//!
//! `RemotePersistence` over a Realtime-Database style JSON API:
//! `GET|POST /<collection>.json`, `PUT|DELETE /<collection>/<id>.json`.

use std::marker::PhantomData;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use super::traits::RemotePersistence;
use crate::domain::{DomainError, DomainResult, Entity};

/// Characters that may not appear raw inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn collection_url(base_url: &str, collection: &str) -> String {
    format!(
        "{}/{}.json",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(collection, SEGMENT)
    )
}

pub fn record_url(base_url: &str, collection: &str, id: &str) -> String {
    format!(
        "{}/{}/{}.json",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(collection, SEGMENT),
        utf8_percent_encode(id, SEGMENT)
    )
}

/// Decode a collection read. The store answers `null` for an empty
/// collection, an object keyed by id otherwise, or an array with holes
/// when the keys happen to be small integers. Records that fail to decode
/// are skipped.
pub fn parse_collection<T: Entity>(body: Value) -> DomainResult<Vec<T>> {
    let entries: Vec<(String, Value)> = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => {
            return Err(DomainError::Serialization(format!(
                "expected collection object, got {}",
                other
            )))
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        match serde_json::from_value::<T>(value) {
            Ok(mut record) => {
                record.assign_id(T::Id::from(key));
                records.push(record);
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping undecodable record"),
        }
    }
    Ok(records)
}

/// POST answers `{"name": "<generated key>"}`
pub fn parse_created_id(body: &Value) -> DomainResult<String> {
    body.get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DomainError::Serialization("create response has no 'name'".to_string()))
}

/// HTTP implementation of a remote collection
pub struct RestRepository<T> {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RestRepository<T> {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, collection)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            collection: collection.into(),
            _marker: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        collection_url(&self.base_url, &self.collection)
    }

    fn record_url(&self, id: &str) -> DomainResult<String> {
        if id.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "record in '{}' has no id",
                self.collection
            )));
        }
        Ok(record_url(&self.base_url, &self.collection, id))
    }
}

/// Map non-2xx answers to `Network`
async fn checked(response: reqwest::Response) -> DomainResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DomainError::Network(format!("{} {}", status.as_u16(), response.url())))
    }
}

#[async_trait(?Send)]
impl<T: Entity> RemotePersistence<T> for RestRepository<T> {
    async fn create(&self, entity: &T) -> DomainResult<T::Id> {
        let url = self.collection_url();
        tracing::debug!(%url, "POST");
        let response = checked(self.client.post(&url).json(entity).send().await?).await?;
        let body: Value = response.json().await?;
        Ok(T::Id::from(parse_created_id(&body)?))
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        let url = self.collection_url();
        tracing::debug!(%url, "GET");
        let response = checked(self.client.get(&url).send().await?).await?;
        let body: Value = response.json().await?;
        parse_collection(body)
    }

    async fn update(&self, entity: &T) -> DomainResult<()> {
        let url = self.record_url(entity.id().as_ref())?;
        tracing::debug!(%url, "PUT");
        checked(self.client.put(&url).json(entity).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, id: &T::Id) -> DomainResult<()> {
        let url = self.record_url(id.as_ref())?;
        tracing::debug!(%url, "DELETE");
        checked(self.client.delete(&url).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contact, Task, TaskStatus};
    use serde_json::json;

    #[test]
    fn test_urls() {
        assert_eq!(
            collection_url("https://board.example.com/", "tasks"),
            "https://board.example.com/tasks.json"
        );
        assert_eq!(
            record_url("https://board.example.com", "tasks", "-Nx/y z"),
            "https://board.example.com/tasks/-Nx%2Fy%20z.json"
        );
    }

    #[test]
    fn test_parse_keyed_collection() {
        let body = json!({
            "-N1": {"title": "First", "status": "done", "order": 0},
            "-N2": {"title": "Second"},
            "-N3": {"no_title": true}
        });
        let mut tasks: Vec<Task> = parse_collection(body).unwrap();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_str(), "-N1");
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[1].status, TaskStatus::ToDo);
    }

    #[test]
    fn test_parse_keeps_tasks_with_odd_due_dates() {
        let body = json!({
            "-N1": {"title": "Plain", "dueDate": "2024-05-01"},
            "-N2": {"title": "Local format", "dueDate": "01/05/2024"},
            "-N3": {"title": "Timestamp", "dueDate": "2024-05-01T10:00:00Z"}
        });
        let mut tasks: Vec<Task> = parse_collection(body).unwrap();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["-N1", "-N2", "-N3"]);
        assert!(tasks[1].due_date.is_none());
        assert_eq!(tasks[2].due_date, tasks[0].due_date);
    }

    #[test]
    fn test_parse_null_and_sparse_array() {
        let empty: Vec<Contact> = parse_collection(Value::Null).unwrap();
        assert!(empty.is_empty());

        let body = json!([null, {"name": "Ada", "email": "ada@example.com"}]);
        let contacts: Vec<Contact> = parse_collection(body).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, "1");
    }

    #[test]
    fn test_parse_rejects_scalar_body() {
        assert!(parse_collection::<Task>(json!("oops")).is_err());
    }

    #[test]
    fn test_parse_created_id() {
        assert_eq!(parse_created_id(&json!({"name": "-Nabc"})).unwrap(), "-Nabc");
        assert!(parse_created_id(&json!({})).is_err());
    }

    #[test]
    fn test_update_requires_id() {
        let repo: RestRepository<Task> = RestRepository::new("http://localhost:9000", "tasks");
        assert!(matches!(repo.record_url(""), Err(DomainError::InvalidInput(_))));
    }
}
