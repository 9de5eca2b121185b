//! rdkafka-backed [`Admin`] implementation.
//!
//! Metadata, watermark and offset operations go through `BaseConsumer` (the
//! librdkafka consumer API is blocking, so calls run on the blocking pool);
//! topic CRUD and config describe go through the native `AdminClient`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, ResourceSpecifier, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::consumer::{BaseConsumer, CommitMode, Consumer};
use rdkafka::{ClientConfig, Offset, TopicPartitionList};

use crate::{
    Admin, AdminError, BrokerInfo, ClusterInfo, ConfigEntryInfo, GroupInfo, NewTopicSpec,
    PartitionDetail, PartitionOffset, Result, TopicDescription, TopicOffsets,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct KafkaAdmin {
    client_config: ClientConfig,
    consumer: Arc<BaseConsumer>,
    admin: AdminClient<DefaultClientContext>,
}

impl KafkaAdmin {
    pub fn new(client_config: ClientConfig) -> Result<Self> {
        let consumer: BaseConsumer = {
            let mut config = client_config.clone();
            config.set("group.id", "kafka-tool-admin");
            config.create()?
        };
        let admin: AdminClient<DefaultClientContext> = client_config.create()?;
        Ok(Self {
            client_config,
            consumer: Arc::new(consumer),
            admin,
        })
    }

    pub fn from_config(config: &kafka_config::Config) -> Result<Self> {
        Self::new(ClientConfig::from(config))
    }

    /// Consumer bound to the given group, for committed-offset reads and
    /// commits. Auto-commit stays off; every commit here is explicit.
    fn group_consumer(&self, group_id: &str) -> Result<Arc<BaseConsumer>> {
        let mut config = self.client_config.clone();
        config
            .set("group.id", group_id)
            .set("enable.auto.commit", "false");
        let consumer: BaseConsumer = config.create()?;
        Ok(Arc::new(consumer))
    }
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await?
}

fn offset_to_string(offset: Offset) -> String {
    match offset {
        Offset::Offset(value) => value.to_string(),
        Offset::Beginning => "-2".to_string(),
        // End and "no committed offset" both surface as the latest sentinel
        _ => "-1".to_string(),
    }
}

fn offset_from_string(value: &str) -> Result<Offset> {
    value
        .trim()
        .parse::<i64>()
        .map(Offset::from_raw)
        .map_err(|_| AdminError::InvalidOffset(value.to_string()))
}

fn partition_ids(
    consumer: &BaseConsumer,
    topic: &str,
) -> std::result::Result<Vec<i32>, rdkafka::error::KafkaError> {
    let metadata = consumer.fetch_metadata(Some(topic), REQUEST_TIMEOUT)?;
    Ok(metadata
        .topics()
        .iter()
        .filter(|entry| entry.name() == topic)
        .flat_map(|entry| entry.partitions().iter().map(|partition| partition.id()))
        .collect())
}

#[async_trait]
impl Admin for KafkaAdmin {
    async fn list_topics(&self) -> Result<Vec<String>> {
        let consumer = Arc::clone(&self.consumer);
        blocking(move || {
            let metadata = consumer.fetch_metadata(None, REQUEST_TIMEOUT)?;
            Ok(metadata
                .topics()
                .iter()
                .map(|topic| topic.name().to_string())
                .collect())
        })
        .await
    }

    async fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        let consumer = Arc::clone(&self.consumer);
        blocking(move || {
            let list = consumer.fetch_group_list(None, REQUEST_TIMEOUT)?;
            Ok(list
                .groups()
                .iter()
                .map(|group| GroupInfo {
                    group_id: group.name().to_string(),
                    protocol_type: group.protocol_type().to_string(),
                    state: group.state().to_string(),
                })
                .collect())
        })
        .await
    }

    async fn describe_cluster(&self) -> Result<ClusterInfo> {
        let consumer = Arc::clone(&self.consumer);
        blocking(move || {
            let metadata = consumer.fetch_metadata(None, REQUEST_TIMEOUT)?;
            Ok(ClusterInfo {
                brokers: metadata
                    .brokers()
                    .iter()
                    .map(|broker| BrokerInfo {
                        node_id: broker.id(),
                        host: broker.host().to_string(),
                        port: broker.port(),
                    })
                    .collect(),
                origin_broker_id: metadata.orig_broker_id(),
                origin_broker_name: metadata.orig_broker_name().to_string(),
            })
        })
        .await
    }

    async fn fetch_group_offsets(&self, group_id: &str) -> Result<Vec<TopicOffsets>> {
        let consumer = self.group_consumer(group_id)?;
        blocking(move || {
            let metadata = consumer.fetch_metadata(None, REQUEST_TIMEOUT)?;
            let mut assignment = TopicPartitionList::new();
            for topic in metadata.topics() {
                for partition in topic.partitions() {
                    assignment.add_partition(topic.name(), partition.id());
                }
            }
            let committed = consumer.committed_offsets(assignment, REQUEST_TIMEOUT)?;

            let mut offsets: Vec<TopicOffsets> = Vec::new();
            for element in committed.elements() {
                let row = PartitionOffset {
                    partition: element.partition(),
                    offset: offset_to_string(element.offset()),
                };
                match offsets.iter_mut().find(|entry| entry.topic == element.topic()) {
                    Some(entry) => entry.partitions.push(row),
                    None => offsets.push(TopicOffsets {
                        topic: element.topic().to_string(),
                        partitions: vec![row],
                    }),
                }
            }
            // only topics the group actually holds offsets on
            offsets.retain(|entry| {
                entry
                    .partitions
                    .iter()
                    .any(|partition| partition.offset.parse::<i64>().is_ok_and(|v| v >= 0))
            });
            Ok(offsets)
        })
        .await
    }

    async fn offsets_for_timestamp(
        &self,
        topic: &str,
        timestamp_ms: i64,
    ) -> Result<Vec<PartitionOffset>> {
        let consumer = Arc::clone(&self.consumer);
        let topic = topic.to_string();
        blocking(move || {
            let mut request = TopicPartitionList::new();
            for partition in partition_ids(&consumer, &topic)? {
                request.add_partition_offset(&topic, partition, Offset::Offset(timestamp_ms))?;
            }
            let resolved = consumer.offsets_for_times(request, REQUEST_TIMEOUT)?;
            Ok(resolved
                .elements()
                .iter()
                .map(|element| PartitionOffset {
                    partition: element.partition(),
                    offset: offset_to_string(element.offset()),
                })
                .collect())
        })
        .await
    }

    async fn commit_offsets(
        &self,
        group_id: &str,
        topic: &str,
        partitions: &[PartitionOffset],
    ) -> Result<()> {
        let mut target = TopicPartitionList::new();
        for entry in partitions {
            target.add_partition_offset(topic, entry.partition, offset_from_string(&entry.offset)?)?;
        }
        let consumer = self.group_consumer(group_id)?;
        blocking(move || {
            consumer.commit(&target, CommitMode::Sync)?;
            Ok(())
        })
        .await
    }

    async fn reset_offsets(&self, group_id: &str, topic: &str, earliest: bool) -> Result<()> {
        let consumer = self.group_consumer(group_id)?;
        let topic = topic.to_string();
        blocking(move || {
            let mut target = TopicPartitionList::new();
            for partition in partition_ids(&consumer, &topic)? {
                let (low, high) = consumer.fetch_watermarks(&topic, partition, REQUEST_TIMEOUT)?;
                let offset = if earliest { low } else { high };
                target.add_partition_offset(&topic, partition, Offset::Offset(offset))?;
            }
            consumer.commit(&target, CommitMode::Sync)?;
            Ok(())
        })
        .await
    }

    async fn describe_topic(&self, topic: &str) -> Result<TopicDescription> {
        let consumer = Arc::clone(&self.consumer);
        let topic = topic.to_string();
        blocking(move || {
            let metadata = consumer.fetch_metadata(Some(&topic), REQUEST_TIMEOUT)?;
            let entry = metadata
                .topics()
                .iter()
                .find(|entry| entry.name() == topic)
                .ok_or_else(|| AdminError::Topic {
                    topic: topic.clone(),
                    message: "no metadata returned".to_string(),
                })?;

            let mut partitions = Vec::with_capacity(entry.partitions().len());
            for partition in entry.partitions() {
                let (low, high) =
                    consumer.fetch_watermarks(&topic, partition.id(), REQUEST_TIMEOUT)?;
                partitions.push(PartitionDetail {
                    partition: partition.id(),
                    low,
                    high,
                    leader: partition.leader(),
                    replicas: partition.replicas().to_vec(),
                    isr: partition.isr().to_vec(),
                });
            }
            partitions.sort_by_key(|partition| partition.partition);
            Ok(TopicDescription {
                name: topic.clone(),
                partitions,
            })
        })
        .await
    }

    async fn describe_topic_configs(&self, topic: &str) -> Result<Vec<ConfigEntryInfo>> {
        let results = self
            .admin
            .describe_configs(
                &[ResourceSpecifier::Topic(topic)],
                &AdminOptions::new().request_timeout(Some(REQUEST_TIMEOUT)),
            )
            .await?;

        let mut entries = Vec::new();
        for result in results {
            let resource = result.map_err(|code| AdminError::Topic {
                topic: topic.to_string(),
                message: code.to_string(),
            })?;
            entries.extend(resource.entries.into_iter().map(|entry| ConfigEntryInfo {
                name: entry.name,
                value: entry.value,
                is_default: entry.is_default,
                is_read_only: entry.is_read_only,
                is_sensitive: entry.is_sensitive,
            }));
        }
        Ok(entries)
    }

    async fn create_topic(&self, spec: &NewTopicSpec) -> Result<()> {
        let assignment: Vec<&[i32]> = spec
            .replica_assignment
            .iter()
            .map(Vec::as_slice)
            .collect();
        let replication = if assignment.is_empty() {
            TopicReplication::Fixed(spec.replication_factor)
        } else {
            TopicReplication::Variable(&assignment)
        };

        let mut new_topic = NewTopic::new(&spec.name, spec.num_partitions, replication);
        for (key, value) in &spec.config_entries {
            new_topic = new_topic.set(key, value);
        }

        let results = self
            .admin
            .create_topics(
                &[new_topic],
                &AdminOptions::new().operation_timeout(Some(REQUEST_TIMEOUT)),
            )
            .await?;
        for result in results {
            result.map_err(|(name, code)| AdminError::Topic {
                topic: name,
                message: code.to_string(),
            })?;
        }
        Ok(())
    }

    async fn delete_topic(&self, topic: &str, timeout_ms: i32) -> Result<()> {
        let timeout = Duration::from_millis(timeout_ms.max(0) as u64);
        let results = self
            .admin
            .delete_topics(
                &[topic],
                &AdminOptions::new().operation_timeout(Some(timeout)),
            )
            .await?;
        for result in results {
            result.map_err(|(name, code)| AdminError::Topic {
                topic: name,
                message: code.to_string(),
            })?;
        }
        Ok(())
    }

    async fn delete_topic_records(&self, topic: &str) -> Result<()> {
        let consumer = Arc::clone(&self.consumer);
        let owned_topic = topic.to_string();
        let mut target = TopicPartitionList::new();
        for partition in
            blocking(move || partition_ids(&consumer, &owned_topic).map_err(AdminError::from))
                .await?
        {
            // Offset::End truncates the whole partition
            target.add_partition_offset(topic, partition, Offset::End)?;
        }
        self.admin
            .delete_records(
                &target,
                &AdminOptions::new().operation_timeout(Some(REQUEST_TIMEOUT)),
            )
            .await?;
        Ok(())
    }
}
