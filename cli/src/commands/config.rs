//! set-config / get-config / clear-config.

use anyhow::Result;
use kafka_config::store::ProfileStore;
use kafka_config::ConfigError;

/// Merge a JSON payload into the environment's stored profile and echo the
/// resulting full configuration. Validation failures are operator feedback,
/// not command failures.
pub fn set(env: &str, json: &str) -> Result<()> {
    match kafka_config::set_config(env, json) {
        Ok(config) => {
            log::info!("config successfully loaded");
            log::info!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Err(err @ (ConfigError::Invalid(_) | ConfigError::Payload(_) | ConfigError::PayloadNotAnObject)) => {
            log::error!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn get(env: &str) -> Result<()> {
    let config = super::load_config(env)?;
    log::info!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn clear(env: &str) -> Result<()> {
    let mut store = ProfileStore::open(env)?;
    store.clear()?;
    log::info!(
        "{}",
        serde_json::to_string_pretty(&store.snapshot())?
    );
    Ok(())
}
