use anyhow::anyhow;

pub mod cluster;
pub mod config;
pub mod groups;
pub mod reset_offset;
pub mod schemas;
pub mod set_group_offset;
pub mod show_group_offset;
pub mod topics;

/// Load the active environment's validated configuration.
///
/// Every violation is logged individually; the returned error carries only a
/// summary, and `main` turns it into the non-zero exit code.
pub fn load_config(env: &str) -> anyhow::Result<kafka_config::Config> {
    match kafka_config::load_config(env) {
        Ok(config) => Ok(config),
        Err(kafka_config::ConfigError::Invalid(errors)) => {
            log::error!("Please set required config options via set-config <configAsJson>:");
            for message in errors.messages() {
                log::error!("{message}");
            }
            Err(anyhow!("invalid configuration for environment '{env}'"))
        }
        Err(err) => Err(err.into()),
    }
}
