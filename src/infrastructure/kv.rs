use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    repository::TaskRepository,
    task::{Task, TaskList},
};
use crate::error::StorageError;

#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn init(&self) -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

pub const DEFAULT_RECORD_KEY: &str = "qn_tasks";

#[derive(Clone)]
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self { Self { store, key: key.into() } }
}

#[async_trait]
impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    async fn init(&self) -> Result<(), StorageError> { self.store.init().await }

    async fn load(&self) -> TaskList {
        match self.store.get(&self.key).await {
            Ok(Some(bytes)) => decode_tasks(&bytes),
            Ok(None) => TaskList::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "could not read stored tasks; starting empty");
                TaskList::new()
            }
        }
    }

    async fn save(&self, tasks: &TaskList) -> Result<(), StorageError> {
        let bytes = encode_tasks(tasks)?;
        self.store.put(&self.key, &bytes).await?;
        tracing::debug!(key = %self.key, count = tasks.len(), "saved tasks");
        Ok(())
    }
}

pub fn encode_tasks(tasks: &TaskList) -> Result<Vec<u8>, serde_json::Error> { serde_json::to_vec(tasks) }

/// Anything that is not a JSON array reads as an empty list.
pub fn decode_tasks(bytes: &[u8]) -> TaskList {
    let items = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("stored task record is not a sequence; starting empty");
            return TaskList::new();
        }
        Err(err) => {
            tracing::warn!(%err, "stored task record is not valid JSON; starting empty");
            return TaskList::new();
        }
    };

    let mut seen = HashSet::new();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Task>(item) {
            Ok(task) if task.text.trim().is_empty() => {
                tracing::warn!(index, "skipping stored task with blank text");
                None
            }
            Ok(task) if !seen.insert(task.id.clone()) => {
                tracing::warn!(index, id = %task.id, "skipping stored task with duplicate id");
                None
            }
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!(index, %err, "skipping malformed stored task");
                None
            }
        })
        .collect()
}
