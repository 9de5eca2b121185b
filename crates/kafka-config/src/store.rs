//! Durable per-environment profile storage.
//!
//! Each environment gets one JSON document under the tool's config directory,
//! e.g. `~/.config/kafka-tool/staging.json`. The store is schema-aware only as
//! far as defaults go; type enforcement happens in the validation layer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::ConfigError;

pub const KAFKA_BOOTSTRAP_SERVERS: &str = "kafkaBootstrapServers";
pub const KAFKA_ACCESS_KEY: &str = "kafkaAccessKey";
pub const KAFKA_SECRET_KEY: &str = "kafkaSecretKey";
pub const SCHEMA_REGISTRY_URL: &str = "schemaRegistryUrl";
pub const SCHEMA_REGISTRY_ACCESS_KEY: &str = "schemaRegistryAccessKey";
pub const SCHEMA_REGISTRY_SECRET_KEY: &str = "schemaRegistrySecretKey";
pub const SSL: &str = "ssl";

/// Every field the profile schema knows about.
pub const FIELDS: [&str; 7] = [
    KAFKA_BOOTSTRAP_SERVERS,
    KAFKA_ACCESS_KEY,
    KAFKA_SECRET_KEY,
    SCHEMA_REGISTRY_URL,
    SCHEMA_REGISTRY_ACCESS_KEY,
    SCHEMA_REGISTRY_SECRET_KEY,
    SSL,
];

pub fn is_known_field(field: &str) -> bool {
    FIELDS.contains(&field)
}

/// Declared default for a field when nothing has been stored yet.
pub fn default_for(field: &str) -> Value {
    match field {
        SSL => Value::Bool(false),
        _ => Value::Null,
    }
}

/// Resolve the directory holding the per-environment profile documents.
///
/// `KAFKA_TOOL_CONFIG_DIR` overrides the platform config directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("KAFKA_TOOL_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("kafka-tool"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Handle over one environment's stored profile fields.
///
/// Opening never fails on a missing environment; reads fall back to the
/// schema defaults until something is written.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ProfileStore {
    pub fn open(env: &str) -> Result<Self, ConfigError> {
        Self::open_in(&default_config_dir()?, env)
    }

    pub fn open_in(dir: &Path, env: &str) -> Result<Self, ConfigError> {
        let path = dir.join(format!("{env}.json"));
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| ConfigError::CorruptStore {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value for `field`, or its declared default.
    pub fn get(&self, field: &str) -> Value {
        self.values
            .get(field)
            .cloned()
            .unwrap_or_else(|| default_for(field))
    }

    /// Write a single field and persist the document.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), ConfigError> {
        self.values.insert(field.to_string(), value);
        self.persist()
    }

    /// Drop every stored field, restoring defaults.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.values.clear();
        self.persist()
    }

    /// The full field map with defaults filled in for anything unset.
    pub fn snapshot(&self) -> Map<String, Value> {
        FIELDS
            .iter()
            .map(|field| (field.to_string(), self.get(field)))
            .collect()
    }

    fn persist(&self) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(&self.values).map_err(|source| {
            ConfigError::CorruptStore {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, raw).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_environment_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open_in(dir.path(), "staging").unwrap();

        assert_eq!(store.get(KAFKA_BOOTSTRAP_SERVERS), Value::Null);
        assert_eq!(store.get(SSL), json!(false));
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open_in(dir.path(), "staging").unwrap();
        store
            .set(KAFKA_BOOTSTRAP_SERVERS, json!("broker:9092"))
            .unwrap();

        let reopened = ProfileStore::open_in(dir.path(), "staging").unwrap();
        assert_eq!(reopened.get(KAFKA_BOOTSTRAP_SERVERS), json!("broker:9092"));
    }

    #[test]
    fn environments_do_not_interact() {
        let dir = TempDir::new().unwrap();
        let mut staging = ProfileStore::open_in(dir.path(), "staging").unwrap();
        staging.set(KAFKA_ACCESS_KEY, json!("staging-key")).unwrap();

        let production = ProfileStore::open_in(dir.path(), "production").unwrap();
        assert_eq!(production.get(KAFKA_ACCESS_KEY), Value::Null);
    }

    #[test]
    fn clear_restores_every_default() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open_in(dir.path(), "staging").unwrap();
        store.set(KAFKA_ACCESS_KEY, json!("key")).unwrap();
        store.set(SSL, json!(true)).unwrap();

        store.clear().unwrap();
        for field in FIELDS {
            assert_eq!(store.get(field), default_for(field), "field {field}");
        }

        let reopened = ProfileStore::open_in(dir.path(), "staging").unwrap();
        assert_eq!(reopened.get(SSL), json!(false));
    }

    #[test]
    fn snapshot_mixes_stored_values_and_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open_in(dir.path(), "staging").unwrap();
        store.set(KAFKA_SECRET_KEY, json!("secret")).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), FIELDS.len());
        assert_eq!(snapshot[KAFKA_SECRET_KEY], json!("secret"));
        assert_eq!(snapshot[SSL], json!(false));
        assert_eq!(snapshot[SCHEMA_REGISTRY_URL], Value::Null);
    }

    #[test]
    fn corrupted_document_is_reported_with_its_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("staging.json"), "not json").unwrap();

        let err = ProfileStore::open_in(dir.path(), "staging").unwrap_err();
        assert!(matches!(err, ConfigError::CorruptStore { .. }));
    }
}
