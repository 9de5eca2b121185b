use rdkafka::ClientConfig;
use url::Url;

use crate::{Config, ConfigError};

/// Connection settings for the schema-registry HTTP client.
#[derive(Clone, Debug)]
pub struct SchemaRegistrySettings {
    pub endpoint: Url,
    pub basic_auth: Option<(String, String)>,
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        let mut client_config = ClientConfig::new();
        client_config.set("bootstrap.servers", &config.kafka_bootstrap_servers);

        // SASL is only enabled when both halves of the key pair are usable;
        // an empty half degrades to an unauthenticated connection.
        let authenticated =
            !config.kafka_access_key.is_empty() && !config.kafka_secret_key.is_empty();
        let protocol = match (authenticated, config.ssl) {
            (true, true) => "SASL_SSL",
            (true, false) => "SASL_PLAINTEXT",
            (false, true) => "SSL",
            (false, false) => "PLAINTEXT",
        };
        client_config.set("security.protocol", protocol);
        if authenticated {
            client_config.set("sasl.mechanisms", "PLAIN");
            client_config.set("sasl.username", &config.kafka_access_key);
            client_config.set("sasl.password", &config.kafka_secret_key);
        }

        client_config
    }
}

impl Config {
    /// Registry settings, or `None` when no registry URL is configured.
    pub fn schema_registry(&self) -> Result<Option<SchemaRegistrySettings>, ConfigError> {
        let Some(url) = &self.schema_registry_url else {
            return Ok(None);
        };
        let endpoint = Url::parse(url).map_err(|source| ConfigError::RegistryUrl {
            url: url.clone(),
            source,
        })?;
        let basic_auth = match (
            &self.schema_registry_access_key,
            &self.schema_registry_secret_key,
        ) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };
        Ok(Some(SchemaRegistrySettings {
            endpoint,
            basic_auth,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            kafka_bootstrap_servers: "broker:9092".into(),
            kafka_access_key: "access".into(),
            kafka_secret_key: "secret".into(),
            schema_registry_url: None,
            schema_registry_access_key: None,
            schema_registry_secret_key: None,
            ssl: false,
        }
    }

    #[test]
    fn sasl_enabled_when_both_keys_present() {
        let client_config = ClientConfig::from(&{
            let mut c = config();
            c.ssl = true;
            c
        });
        assert_eq!(client_config.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(client_config.get("sasl.username"), Some("access"));
        assert_eq!(client_config.get("sasl.mechanisms"), Some("PLAIN"));
    }

    #[test]
    fn empty_key_half_degrades_to_no_auth() {
        let mut c = config();
        c.kafka_secret_key = String::new();
        let client_config = ClientConfig::from(&c);
        assert_eq!(client_config.get("security.protocol"), Some("PLAINTEXT"));
        assert_eq!(client_config.get("sasl.username"), None);
    }

    #[test]
    fn registry_auth_requires_both_registry_keys() {
        let mut c = config();
        c.schema_registry_url = Some("http://registry:8081".into());
        c.schema_registry_access_key = Some("ra".into());

        let settings = c.schema_registry().unwrap().unwrap();
        assert_eq!(settings.endpoint.as_str(), "http://registry:8081/");
        assert!(settings.basic_auth.is_none());

        c.schema_registry_secret_key = Some("rs".into());
        let settings = c.schema_registry().unwrap().unwrap();
        assert_eq!(settings.basic_auth, Some(("ra".into(), "rs".into())));
    }

    #[test]
    fn no_registry_url_means_no_settings() {
        assert!(config().schema_registry().unwrap().is_none());
    }
}
