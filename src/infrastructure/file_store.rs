use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::kv::KeyValueStore;
use crate::error::StorageError;

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    async fn read_records(&self) -> Result<Map<String, Value>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(records)) => Ok(records),
            _ => {
                tracing::warn!(path = %self.path.display(), "store file is not a JSON object; treating as empty");
                Ok(Map::new())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn init(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let records = self.read_records().await?;
        records.get(key).map(serde_json::to_vec).transpose().map_err(Into::into)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let value: Value = serde_json::from_slice(value)?;
        let mut records = self.read_records().await?;
        records.insert(key.to_owned(), value);

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&records)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
