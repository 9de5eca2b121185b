//! Topic listing, inspection, creation and deletion.

use anyhow::Result;
use kafka_admin::{topic_exists, Admin, NewTopicSpec};
use serde::Deserialize;
use serde_json::Value;

pub async fn list<A: Admin + ?Sized>(admin: &A) -> Result<()> {
    let topics = admin.list_topics().await?;
    // internal topics stay hidden
    for topic in topics.iter().filter(|name| !name.starts_with('_')) {
        log::info!("{topic}");
    }
    Ok(())
}

pub async fn show<A: Admin + ?Sized>(admin: &A, opts: &args::ShowTopicArgs) -> Result<()> {
    if !topic_exists(admin, &opts.topic).await? {
        log::info!("Topic '{}' does not exist", opts.topic);
        return Ok(());
    }

    let description = admin.describe_topic(&opts.topic).await?;
    log::info!("topic: {}", description.name);
    log::info!("number of partitions: {}", description.partitions.len());
    log::info!(
        "{:<10} {:>12} {:>12} {:>8}  {:<16} {:<16}",
        "partition",
        "low",
        "high",
        "leader",
        "replicas",
        "isr"
    );
    for partition in &description.partitions {
        log::info!(
            "{:<10} {:>12} {:>12} {:>8}  {:<16} {:<16}",
            partition.partition,
            partition.low,
            partition.high,
            partition.leader,
            format!("{:?}", partition.replicas),
            format!("{:?}", partition.isr)
        );
    }

    if opts.verbose {
        log::info!("Topic config entries:");
        for entry in admin.describe_topic_configs(&opts.topic).await? {
            log::info!(
                "{} = {} (default: {}, read-only: {}, sensitive: {})",
                entry.name,
                entry.value.as_deref().unwrap_or("-"),
                entry.is_default,
                entry.is_read_only,
                entry.is_sensitive
            );
        }
    }
    Ok(())
}

pub async fn create<A: Admin + ?Sized>(admin: &A, opts: &args::CreateTopicArgs) -> Result<()> {
    if topic_exists(admin, &opts.topic).await? {
        log::warn!("Topic '{}' already exists", opts.topic);
        return Ok(());
    }

    let replica_assignment = match parse_replica_assignment(&opts.replica_assignment) {
        Ok(assignment) => assignment,
        Err(errors) => {
            for message in &errors {
                log::error!("{message}");
            }
            return Ok(());
        }
    };
    let config_entries = match parse_config_entries(&opts.config_entries) {
        Ok(entries) => entries,
        Err(message) => {
            log::error!("{message}");
            return Ok(());
        }
    };

    let spec = NewTopicSpec {
        name: opts.topic.clone(),
        num_partitions: opts.partitions_num,
        replication_factor: opts.replication_factor,
        replica_assignment,
        config_entries,
    };
    admin.create_topic(&spec).await?;
    log::info!(
        "Topic \"{}\" is successfully created with {} partition(s)",
        opts.topic,
        opts.partitions_num
    );
    Ok(())
}

pub async fn delete<A: Admin + ?Sized>(admin: &A, opts: &args::DeleteTopicArgs) -> Result<()> {
    if !topic_exists(admin, &opts.topic).await? {
        log::warn!("Topic '{}' has already been deleted", opts.topic);
        return Ok(());
    }

    admin.delete_topic(&opts.topic, opts.timeout).await?;
    if !topic_exists(admin, &opts.topic).await? {
        log::info!("Topic '{}' successfully deleted", opts.topic);
    }
    Ok(())
}

pub async fn delete_messages<A: Admin + ?Sized>(
    admin: &A,
    opts: &args::DeleteTopicMessagesArgs,
) -> Result<()> {
    if !topic_exists(admin, &opts.topic).await? {
        log::warn!("topic {} does not exist", opts.topic);
        return Ok(());
    }

    admin.delete_topic_records(&opts.topic).await?;
    log::info!("all messages in topic {} were deleted", opts.topic);
    Ok(())
}

#[derive(Deserialize)]
struct ReplicaAssignmentEntry {
    partition: i32,
    replicas: Vec<i32>,
}

/// Parse the `--replica-assignment` JSON, collecting every violation before
/// reporting instead of stopping at the first bad entry.
fn parse_replica_assignment(raw: &str) -> std::result::Result<Vec<Vec<i32>>, Vec<String>> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| vec![format!("replicaAssignment is not valid json: {err}")])?;
    let Some(items) = parsed.as_array() else {
        return Err(vec!["replicaAssignment is not an array".to_string()]);
    };

    let mut errors = Vec::new();
    let mut entries = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<ReplicaAssignmentEntry>(item.clone()) {
            Ok(entry) if entry.replicas.is_empty() => {
                errors.push(format!("'replicas' is empty in replicaAssignment[{index}]"));
            }
            Ok(entry) => entries.push(entry),
            Err(err) => errors.push(format!("replicaAssignment[{index}] is invalid: {err}")),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    entries.sort_by_key(|entry| entry.partition);
    Ok(entries.into_iter().map(|entry| entry.replicas).collect())
}

fn parse_config_entries(raw: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| format!("configEntries is not valid json: {err}"))?;
    let Some(object) = parsed.as_object() else {
        return Err("configEntries is not an object".to_string());
    };
    Ok(object
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(value) => value.clone(),
                other => other.to_string(),
            };
            (name.clone(), value)
        })
        .collect())
}
