use std::path::PathBuf;

use crate::domain::task::DisplayOrder;
use crate::error::ConfigError;
use crate::infrastructure::kv::DEFAULT_RECORD_KEY;

pub const DEFAULT_STORE: &str = "sqlite://daylist.db";
pub const DEFAULT_LOG_FILE: &str = "daylist.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Sqlite(String),
    File(PathBuf),
    Memory,
}

impl StoreLocation {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::Empty { name: "DAYLIST_STORE" });
        }
        Ok(if raw == "memory:" {
            StoreLocation::Memory
        } else if raw.starts_with("sqlite:") {
            StoreLocation::Sqlite(raw.to_owned())
        } else {
            StoreLocation::File(PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw)))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreLocation,
    pub record_key: String,
    pub order: DisplayOrder,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|name| std::env::var(name).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = StoreLocation::parse(&lookup("DAYLIST_STORE").unwrap_or_else(|| DEFAULT_STORE.to_owned()))?;

        let record_key = lookup("DAYLIST_KEY").unwrap_or_else(|| DEFAULT_RECORD_KEY.to_owned());
        if record_key.trim().is_empty() {
            return Err(ConfigError::Empty { name: "DAYLIST_KEY" });
        }

        let order = match lookup("DAYLIST_ORDER").as_deref().map(str::trim) {
            None | Some("") | Some("created") => DisplayOrder::Created,
            Some("manual") => DisplayOrder::Manual,
            Some(other) => return Err(ConfigError::UnknownOrder(other.to_owned())),
        };

        let log_file = lookup("DAYLIST_LOG").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self { store, record_key, order, log_file })
    }
}
