//! Schema-registry listing and deletion.

use anyhow::{bail, Result};
use kafka_admin::registry::{SchemaEntry, SchemaRegistryClient};
use kafka_config::Config;
use serde_json::{json, Value};

fn registry_client(config: &Config) -> Result<SchemaRegistryClient> {
    let Some(settings) = config.schema_registry()? else {
        bail!("schemaRegistryUrl is not configured for this environment");
    };
    Ok(SchemaRegistryClient::new(settings)?)
}

pub async fn list(config: &Config, opts: &args::ListSchemasArgs) -> Result<()> {
    let client = registry_client(config)?;
    let mut entries = client.list_schemas().await?;
    if let Some(name) = &opts.name {
        entries.retain(|entry| entry.subject.contains(name.as_str()));
    }
    if opts.one {
        entries.truncate(1);
    }

    let rendered = render(&entries, opts);
    log::info!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

/// Shape the entries per the display flags. The schema body is registry
/// JSON stored as a string; it stays a string only when asked for.
fn render(entries: &[SchemaEntry], opts: &args::ListSchemasArgs) -> Value {
    let items: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let schema = if opts.stringify_schema {
                Value::String(entry.schema.clone())
            } else {
                serde_json::from_str(&entry.schema)
                    .unwrap_or_else(|_| Value::String(entry.schema.clone()))
            };
            if opts.names_only {
                Value::String(entry.subject.clone())
            } else if opts.schemas_only {
                schema
            } else {
                json!({
                    "subject": entry.subject,
                    "version": entry.version,
                    "id": entry.id,
                    "schema": schema,
                })
            }
        })
        .collect();

    if opts.one {
        items.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::Array(items)
    }
}

/// Soft-delete a subject (or a single version), then hard-delete the same
/// versions when `--permanent` is set. The registry requires the soft pass
/// before it accepts a permanent one.
pub async fn delete(config: &Config, opts: &args::DeleteSchemaArgs) -> Result<()> {
    let client = registry_client(config)?;

    let soft_deleted = client
        .delete_subject(&opts.schema, opts.version, false)
        .await?;
    if soft_deleted.is_empty() {
        log::warn!("schema '{}' does not exist", opts.schema);
        return Ok(());
    }

    let hard_deleted = if opts.permanent {
        client
            .delete_subject(&opts.schema, opts.version, true)
            .await?
    } else {
        Vec::new()
    };

    log::info!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "softDeleted": soft_deleted,
            "hardDeleted": hard_deleted,
        }))?
    );
    Ok(())
}
