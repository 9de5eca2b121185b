//! Admin access to the Kafka cluster and the schema registry.
//!
//! The [`Admin`] trait is the seam between command orchestration and the wire
//! protocol: commands are generic over it, the rdkafka-backed [`KafkaAdmin`]
//! implements it for real clusters, and the `fake` feature provides an
//! in-memory implementation with call counters for tests.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

mod client;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod offsets;
pub mod registry;

pub use client::KafkaAdmin;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("schema registry request failed: {0}")]
    Registry(#[from] reqwest::Error),

    /// Error response from the registry, body included verbatim.
    #[error("schema registry returned {status}: {body}")]
    RegistryResponse { status: u16, body: String },

    #[error("topic operation failed for '{topic}': {message}")]
    Topic { topic: String, message: String },

    #[error("'{0}' is not a committable offset")]
    InvalidOffset(String),

    #[error("admin task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One partition's offset, as read from or destined for the cluster.
///
/// The offset stays a literal string end to end; sentinel values such as
/// "-1" (latest) and "-2" (earliest) are legal targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionOffset {
    pub partition: i32,
    pub offset: String,
}

/// A consumer group's offsets for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOffsets {
    pub topic: String,
    pub partitions: Vec<PartitionOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: String,
    pub protocol_type: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerInfo {
    pub node_id: i32,
    pub host: String,
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub brokers: Vec<BrokerInfo>,
    pub origin_broker_id: i32,
    pub origin_broker_name: String,
}

/// Partition metadata joined with its watermarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionDetail {
    pub partition: i32,
    pub low: i64,
    pub high: i64,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicDescription {
    pub name: String,
    pub partitions: Vec<PartitionDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntryInfo {
    pub name: String,
    pub value: Option<String>,
    pub is_default: bool,
    pub is_read_only: bool,
    pub is_sensitive: bool,
}

#[derive(Debug, Clone)]
pub struct NewTopicSpec {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i32,
    /// Per-partition replica broker ids; empty means broker-assigned.
    pub replica_assignment: Vec<Vec<i32>>,
    pub config_entries: Vec<(String, String)>,
}

/// Administrative operations against the cluster.
///
/// One logical admin session per process invocation; implementations release
/// their connection when dropped, on every exit path.
#[async_trait]
pub trait Admin: Send + Sync {
    async fn list_topics(&self) -> Result<Vec<String>>;

    async fn list_groups(&self) -> Result<Vec<GroupInfo>>;

    async fn describe_cluster(&self) -> Result<ClusterInfo>;

    /// Committed offsets for every topic the group has offsets on.
    async fn fetch_group_offsets(&self, group_id: &str) -> Result<Vec<TopicOffsets>>;

    /// Per-partition offsets nearest to (at or after) the given timestamp.
    async fn offsets_for_timestamp(&self, topic: &str, timestamp_ms: i64)
        -> Result<Vec<PartitionOffset>>;

    async fn commit_offsets(
        &self,
        group_id: &str,
        topic: &str,
        partitions: &[PartitionOffset],
    ) -> Result<()>;

    /// Reset every partition of `topic` to the earliest or latest watermark.
    async fn reset_offsets(&self, group_id: &str, topic: &str, earliest: bool) -> Result<()>;

    async fn describe_topic(&self, topic: &str) -> Result<TopicDescription>;

    async fn describe_topic_configs(&self, topic: &str) -> Result<Vec<ConfigEntryInfo>>;

    async fn create_topic(&self, spec: &NewTopicSpec) -> Result<()>;

    async fn delete_topic(&self, topic: &str, timeout_ms: i32) -> Result<()>;

    /// Delete every record in every partition of the topic.
    async fn delete_topic_records(&self, topic: &str) -> Result<()>;
}

pub async fn topic_exists<A: Admin + ?Sized>(admin: &A, topic: &str) -> Result<bool> {
    Ok(admin.list_topics().await?.iter().any(|name| name == topic))
}

pub async fn group_exists<A: Admin + ?Sized>(admin: &A, group_id: &str) -> Result<bool> {
    Ok(admin
        .list_groups()
        .await?
        .iter()
        .any(|group| group.group_id == group_id))
}
