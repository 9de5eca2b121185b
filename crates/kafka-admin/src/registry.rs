//! Thin schema-registry REST client.

use kafka_config::SchemaRegistrySettings;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AdminError, Result};

const ACCEPT_SCHEMA_JSON: &str =
    "application/vnd.schemaregistry.v1+json, application/vnd.schemaregistry+json, application/json";

/// One versioned schema as listed by `GET /schemas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub subject: String,
    pub version: u32,
    pub id: u32,
    pub schema: String,
}

pub struct SchemaRegistryClient {
    http: reqwest::Client,
    settings: SchemaRegistrySettings,
}

impl SchemaRegistryClient {
    pub fn new(settings: SchemaRegistrySettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_SCHEMA_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http, settings })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/{}",
            self.settings.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut builder = self.http.request(method, url);
        if let Some((username, password)) = &self.settings.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }
        builder
    }

    pub async fn list_schemas(&self) -> Result<Vec<SchemaEntry>> {
        let response = self.request(Method::GET, "/schemas").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(registry_error(status, response).await);
        }
        Ok(response.json().await?)
    }

    /// Delete a subject (or one version of it), returning the deleted
    /// version numbers. A 404 is a benign outcome: nothing was there, so
    /// nothing was deleted.
    pub async fn delete_subject(
        &self,
        subject: &str,
        version: Option<u32>,
        permanent: bool,
    ) -> Result<Vec<u32>> {
        let mut path = format!("/subjects/{subject}");
        if let Some(version) = version {
            path.push_str(&format!("/versions/{version}"));
        }
        if permanent {
            path.push_str("?permanent=true");
        }

        let response = self.request(Method::DELETE, &path).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(registry_error(status, response).await);
        }

        // subject deletes answer with an array, version deletes with a bare number
        let body: Value = response.json().await?;
        Ok(deleted_versions(&body))
    }
}

async fn registry_error(status: StatusCode, response: reqwest::Response) -> AdminError {
    AdminError::RegistryResponse {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    }
}

fn deleted_versions(body: &Value) -> Vec<u32> {
    match body {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_u64)
            .map(|version| version as u32)
            .collect(),
        Value::Number(version) => version
            .as_u64()
            .map(|version| vec![version as u32])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
