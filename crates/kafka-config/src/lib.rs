//! Environment-scoped configuration for the admin CLI.
//!
//! A profile is stored per environment name (see [`store::ProfileStore`]) and
//! turned into a typed [`Config`] by [`load_config`]. Validation collects every
//! violation before reporting so the operator fixes the whole profile in one
//! pass instead of replaying the command per field.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

mod into;
pub mod store;
pub use into::*;

use store::ProfileStore;

const REQUIRED_FIELDS: [&str; 3] = [
    store::KAFKA_ACCESS_KEY,
    store::KAFKA_SECRET_KEY,
    store::KAFKA_BOOTSTRAP_SERVERS,
];
const OPTIONAL_FIELDS: [&str; 3] = [
    store::SCHEMA_REGISTRY_ACCESS_KEY,
    store::SCHEMA_REGISTRY_SECRET_KEY,
    store::SCHEMA_REGISTRY_URL,
];

/// Fully validated connection profile for one environment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub kafka_bootstrap_servers: String,
    pub kafka_access_key: String,
    pub kafka_secret_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_registry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_registry_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_registry_secret_key: Option<String>,
    #[serde(default)]
    pub ssl: bool,
}

/// Aggregate of every validation violation found in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigErrors {
    errors: Vec<String>,
}

impl ConfigErrors {
    pub fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} validation error(s):", self.errors.len())?;
        for message in &self.errors {
            writeln!(f, "  {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] ConfigErrors),

    #[error("config payload is not valid JSON: {0}")]
    Payload(serde_json::Error),

    #[error("config payload must be a JSON object")]
    PayloadNotAnObject,

    #[error("profile store {path} is corrupted: {source}")]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to access profile store {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("schemaRegistryUrl '{url}' is not a valid URL: {source}")]
    RegistryUrl {
        url: String,
        source: url::ParseError,
    },
}

fn check_field_type(field: &str, value: &Value, errors: &mut ConfigErrors) {
    match value {
        Value::Bool(_) if field == store::SSL => {}
        Value::String(_) if field != store::SSL => {}
        _ if field == store::SSL => errors.push(format!("field '{field}' is not a boolean")),
        _ => errors.push(format!("field '{field}' is not a string")),
    }
}

/// Validate a full profile snapshot into a [`Config`].
///
/// Collect-all semantics: one error entry per missing or mistyped field,
/// never short-circuiting on the first violation.
pub fn parse_config(values: &Map<String, Value>) -> Result<Config, ConfigErrors> {
    let mut errors = ConfigErrors::default();

    for field in REQUIRED_FIELDS {
        match values.get(field) {
            None | Some(Value::Null) => errors.push(format!("field '{field}' is required")),
            Some(value) => check_field_type(field, value, &mut errors),
        }
    }
    for field in OPTIONAL_FIELDS {
        match values.get(field) {
            None | Some(Value::Null) => {}
            Some(value) => check_field_type(field, value, &mut errors),
        }
    }
    match values.get(store::SSL) {
        None | Some(Value::Null) => {}
        Some(value) => check_field_type(store::SSL, value, &mut errors),
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let required = |field: &str| -> String {
        values
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let optional = |field: &str| -> Option<String> {
        values
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(Config {
        kafka_bootstrap_servers: required(store::KAFKA_BOOTSTRAP_SERVERS),
        kafka_access_key: required(store::KAFKA_ACCESS_KEY),
        kafka_secret_key: required(store::KAFKA_SECRET_KEY),
        schema_registry_url: optional(store::SCHEMA_REGISTRY_URL),
        schema_registry_access_key: optional(store::SCHEMA_REGISTRY_ACCESS_KEY),
        schema_registry_secret_key: optional(store::SCHEMA_REGISTRY_SECRET_KEY),
        ssl: values
            .get(store::SSL)
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Load and validate the active environment's profile.
pub fn load_config(env: &str) -> Result<Config, ConfigError> {
    load_config_in(&store::default_config_dir()?, env)
}

pub fn load_config_in(dir: &Path, env: &str) -> Result<Config, ConfigError> {
    let store = ProfileStore::open_in(dir, env)?;
    Ok(parse_config(&store.snapshot())?)
}

/// Merge a partial JSON profile into the environment's store.
///
/// Type checks run against the supplied fields only; the payload is a partial
/// profile, so required-field presence is judged on the post-merge reload.
/// Nothing persists unless every supplied field is valid.
pub fn set_config(env: &str, payload: &str) -> Result<Config, ConfigError> {
    set_config_in(&store::default_config_dir()?, env, payload)
}

pub fn set_config_in(dir: &Path, env: &str, payload: &str) -> Result<Config, ConfigError> {
    let parsed: Value = serde_json::from_str(payload).map_err(ConfigError::Payload)?;
    let supplied = parsed
        .as_object()
        .ok_or(ConfigError::PayloadNotAnObject)?;

    let mut errors = ConfigErrors::default();
    for (field, value) in supplied {
        if !store::is_known_field(field) {
            errors.push(format!("field '{field}' is unknown"));
            continue;
        }
        check_field_type(field, value, &mut errors);
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let mut store = ProfileStore::open_in(dir, env)?;
    for (field, value) in supplied {
        store.set(field, value.clone())?;
    }

    load_config_in(dir, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn full_profile() -> Map<String, Value> {
        json!({
            "kafkaBootstrapServers": "broker:9092",
            "kafkaAccessKey": "access",
            "kafkaSecretKey": "secret",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn parse_accepts_minimal_profile() {
        let config = parse_config(&full_profile()).unwrap();
        assert_eq!(config.kafka_bootstrap_servers, "broker:9092");
        assert_eq!(config.kafka_access_key, "access");
        assert_eq!(config.kafka_secret_key, "secret");
        assert_eq!(config.schema_registry_url, None);
        assert_eq!(config.schema_registry_access_key, None);
        assert_eq!(config.schema_registry_secret_key, None);
        assert!(!config.ssl);
    }

    #[test]
    fn parse_reports_every_missing_required_field() {
        let errors = parse_config(&Map::new()).unwrap_err();
        assert_eq!(
            errors.messages(),
            &[
                "field 'kafkaAccessKey' is required",
                "field 'kafkaSecretKey' is required",
                "field 'kafkaBootstrapServers' is required",
            ]
        );
    }

    #[test]
    fn parse_collects_mixed_violations_without_short_circuit() {
        let values = json!({
            "kafkaBootstrapServers": 42,
            "kafkaSecretKey": "secret",
            "schemaRegistryUrl": ["not", "a", "string"],
            "ssl": "yes",
        })
        .as_object()
        .cloned()
        .unwrap();

        let errors = parse_config(&values).unwrap_err();
        assert_eq!(
            errors.messages(),
            &[
                "field 'kafkaAccessKey' is required",
                "field 'kafkaBootstrapServers' is not a string",
                "field 'schemaRegistryUrl' is not a string",
                "field 'ssl' is not a boolean",
            ]
        );
    }

    #[test]
    fn parse_keeps_optional_fields_when_supplied() {
        let mut values = full_profile();
        values.insert("schemaRegistryUrl".into(), json!("http://registry:8081"));
        values.insert("ssl".into(), json!(true));

        let config = parse_config(&values).unwrap();
        assert_eq!(
            config.schema_registry_url.as_deref(),
            Some("http://registry:8081")
        );
        assert!(config.ssl);
    }

    #[test]
    fn set_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let payload = r#"{
            "kafkaBootstrapServers": "x",
            "kafkaAccessKey": "a",
            "kafkaSecretKey": "b"
        }"#;

        let echoed = set_config_in(dir.path(), "staging", payload).unwrap();
        let loaded = load_config_in(dir.path(), "staging").unwrap();
        assert_eq!(echoed, loaded);
        assert_eq!(loaded.kafka_bootstrap_servers, "x");
        assert_eq!(loaded.kafka_access_key, "a");
        assert_eq!(loaded.kafka_secret_key, "b");
        assert_eq!(loaded.schema_registry_url, None);
    }

    #[test]
    fn set_config_merges_partial_payload() {
        let dir = TempDir::new().unwrap();
        set_config_in(
            dir.path(),
            "staging",
            r#"{"kafkaBootstrapServers": "x", "kafkaAccessKey": "a", "kafkaSecretKey": "b"}"#,
        )
        .unwrap();

        let updated =
            set_config_in(dir.path(), "staging", r#"{"kafkaAccessKey": "rotated"}"#).unwrap();
        assert_eq!(updated.kafka_access_key, "rotated");
        assert_eq!(updated.kafka_bootstrap_servers, "x");
        assert_eq!(updated.kafka_secret_key, "b");
    }

    #[test]
    fn invalid_payload_persists_nothing() {
        let dir = TempDir::new().unwrap();
        set_config_in(
            dir.path(),
            "staging",
            r#"{"kafkaBootstrapServers": "x", "kafkaAccessKey": "a", "kafkaSecretKey": "b"}"#,
        )
        .unwrap();

        let err = set_config_in(
            dir.path(),
            "staging",
            r#"{"kafkaAccessKey": 7, "kafkaSecretKey": "fine"}"#,
        )
        .unwrap_err();
        let ConfigError::Invalid(errors) = err else {
            panic!("expected validation failure, got {err}");
        };
        assert_eq!(errors.messages(), &["field 'kafkaAccessKey' is not a string"]);

        // Valid fields supplied alongside invalid ones must not leak through.
        let loaded = load_config_in(dir.path(), "staging").unwrap();
        assert_eq!(loaded.kafka_access_key, "a");
        assert_eq!(loaded.kafka_secret_key, "b");
    }

    #[test]
    fn unknown_payload_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let err = set_config_in(dir.path(), "staging", r#"{"bootstrap": "x"}"#).unwrap_err();
        let ConfigError::Invalid(errors) = err else {
            panic!("expected validation failure, got {err}");
        };
        assert_eq!(errors.messages(), &["field 'bootstrap' is unknown"]);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            set_config_in(dir.path(), "staging", "[1, 2]").unwrap_err(),
            ConfigError::PayloadNotAnObject
        ));
        assert!(matches!(
            set_config_in(dir.path(), "staging", "{nope").unwrap_err(),
            ConfigError::Payload(_)
        ));
    }

    #[test]
    fn load_reports_aggregate_on_empty_environment() {
        let dir = TempDir::new().unwrap();
        let err = load_config_in(dir.path(), "untouched").unwrap_err();
        let ConfigError::Invalid(errors) = err else {
            panic!("expected validation failure, got {err}");
        };
        assert_eq!(errors.messages().len(), 3);
    }

    #[test]
    fn config_serializes_without_absent_optionals() {
        let config = parse_config(&full_profile()).unwrap();
        let rendered = serde_json::to_value(&config).unwrap();
        assert_eq!(
            rendered,
            json!({
                "kafkaBootstrapServers": "broker:9092",
                "kafkaAccessKey": "access",
                "kafkaSecretKey": "secret",
                "ssl": false,
            })
        );
    }
}
