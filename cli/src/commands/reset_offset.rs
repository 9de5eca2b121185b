//! Reset a consumer group's offsets to the earliest or latest watermark.

use anyhow::Result;
use kafka_admin::{group_exists, topic_exists, Admin, TopicOffsets};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Offsets after the reset, as read back from the cluster.
    Done(Vec<TopicOffsets>),
    TopicMissing,
    GroupMissing,
}

pub async fn run<A: Admin + ?Sized>(admin: &A, opts: &args::ResetOffsetArgs) -> Result<Outcome> {
    if !topic_exists(admin, &opts.topic).await? {
        log::warn!("topic {} does not exist", opts.topic);
        return Ok(Outcome::TopicMissing);
    }
    if !group_exists(admin, &opts.group_id).await? {
        log::warn!("groupId '{}' does not exist", opts.group_id);
        return Ok(Outcome::GroupMissing);
    }

    admin
        .reset_offsets(&opts.group_id, &opts.topic, opts.earliest)
        .await?;

    let mut offsets = admin.fetch_group_offsets(&opts.group_id).await?;
    offsets.retain(|entry| entry.topic == opts.topic);
    for entry in &mut offsets {
        entry.partitions.sort_by_key(|partition| partition.partition);
    }
    log::info!("{}", serde_json::to_string_pretty(&offsets)?);
    Ok(Outcome::Done(offsets))
}
