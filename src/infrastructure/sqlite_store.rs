use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Row, Sqlite};

use super::kv::KeyValueStore;
use crate::error::StorageError;

#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        prepare_sqlite_dir(database_url)?;
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let options = SqlitePoolOptions::new();
        // Every connection to `sqlite::memory:` opens its own database, so keep
        // exactly one alive for the life of the pool.
        let options = if is_memory_url(database_url) {
            options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            options.max_connections(5)
        };
        let pool = options.connect_with(connect_options).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|row| row.get::<Vec<u8>, _>("value")))
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Creates the parent directory of a file-backed database URL, in either the
/// `sqlite://path` or `sqlite:path` form.
fn prepare_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    if is_memory_url(database_url) { return Ok(()); }
    let Some(path) = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    // On Windows, absolute paths may look like /C:/path; strip the leading slash
    let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
        &path[1..]
    } else {
        path
    };
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_existing_record() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.init().await.unwrap();
        assert_eq!(store.get("qn_tasks").await.unwrap(), None);

        store.put("qn_tasks", b"[1]").await.unwrap();
        store.put("qn_tasks", b"[2]").await.unwrap();
        store.put("other", b"x").await.unwrap();

        assert_eq!(store.get("qn_tasks").await.unwrap().as_deref(), Some(&b"[2]"[..]));
        assert_eq!(store.get("other").await.unwrap().as_deref(), Some(&b"x"[..]));
    }

    #[tokio::test]
    async fn creates_database_file_and_parent_dir() {
        let dir = std::env::temp_dir().join(format!("daylist-sqlite-{}", uuid::Uuid::new_v4()));
        let file = dir.join("nested").join("tasks.db");
        let url = format!("sqlite://{}", file.display());

        let store = SqliteStore::connect(&url).await.unwrap();
        store.init().await.unwrap();
        store.put("k", b"v").await.unwrap();
        assert!(file.exists());

        let reopened = SqliteStore::connect(&url).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some(&b"v"[..]));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn opens_single_colon_file_url() {
        let dir = std::env::temp_dir().join(format!("daylist-sqlite-{}", uuid::Uuid::new_v4()));
        let file = dir.join("tasks.db");
        let url = format!("sqlite:{}", file.display());
        assert!(matches!(crate::config::StoreLocation::parse(&url).unwrap(), crate::config::StoreLocation::Sqlite(_)));

        let store = SqliteStore::connect(&url).await.unwrap();
        store.init().await.unwrap();
        store.put("qn_tasks", b"[]").await.unwrap();
        assert!(file.exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
