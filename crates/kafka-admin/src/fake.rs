//! In-memory [`Admin`] with per-operation call counters.
//!
//! Backs command tests: fixtures are built with the `with_*` helpers and the
//! counters let tests assert that validation failures and dry runs reach the
//! cluster exactly zero times.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Admin, AdminError, BrokerInfo, ClusterInfo, ConfigEntryInfo, GroupInfo, NewTopicSpec,
    PartitionDetail, PartitionOffset, Result, TopicDescription, TopicOffsets,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_topics: usize,
    pub list_groups: usize,
    pub fetch_group_offsets: usize,
    pub offsets_for_timestamp: usize,
    pub commit_offsets: usize,
    pub reset_offsets: usize,
    /// Every trait call, whatever the operation.
    pub total: usize,
}

#[derive(Debug, Clone)]
struct FakePartition {
    partition: i32,
    low: i64,
    high: i64,
}

#[derive(Debug, Clone)]
struct FakeTopic {
    name: String,
    partitions: Vec<FakePartition>,
}

#[derive(Default)]
struct State {
    topics: Vec<FakeTopic>,
    groups: Vec<GroupInfo>,
    /// (group, topic) -> committed offsets, in commit order.
    committed: HashMap<(String, String), Vec<PartitionOffset>>,
    /// topic -> timestamp-resolved offsets, returned in stored order.
    by_timestamp: HashMap<String, Vec<PartitionOffset>>,
    calls: CallCounts,
}

#[derive(Default)]
pub struct FakeAdmin {
    state: Mutex<State>,
}

fn pairs(entries: &[(i32, &str)]) -> Vec<PartitionOffset> {
    entries
        .iter()
        .map(|(partition, offset)| PartitionOffset {
            partition: *partition,
            offset: (*offset).to_string(),
        })
        .collect()
}

impl FakeAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a topic with `(partition, low watermark, high watermark)` triples.
    pub fn with_topic(self, name: &str, partitions: &[(i32, i64, i64)]) -> Self {
        self.state.lock().unwrap().topics.push(FakeTopic {
            name: name.to_string(),
            partitions: partitions
                .iter()
                .map(|(partition, low, high)| FakePartition {
                    partition: *partition,
                    low: *low,
                    high: *high,
                })
                .collect(),
        });
        self
    }

    pub fn with_group(self, group_id: &str) -> Self {
        self.state.lock().unwrap().groups.push(GroupInfo {
            group_id: group_id.to_string(),
            protocol_type: "consumer".to_string(),
            state: "Stable".to_string(),
        });
        self
    }

    pub fn with_timestamp_offsets(self, topic: &str, entries: &[(i32, &str)]) -> Self {
        self.state
            .lock()
            .unwrap()
            .by_timestamp
            .insert(topic.to_string(), pairs(entries));
        self
    }

    pub fn with_committed(self, group_id: &str, topic: &str, entries: &[(i32, &str)]) -> Self {
        self.state
            .lock()
            .unwrap()
            .committed
            .insert((group_id.to_string(), topic.to_string()), pairs(entries));
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls.clone()
    }

    /// Committed offsets recorded for the group/topic, if any.
    pub fn committed(&self, group_id: &str, topic: &str) -> Option<Vec<PartitionOffset>> {
        self.state
            .lock()
            .unwrap()
            .committed
            .get(&(group_id.to_string(), topic.to_string()))
            .cloned()
    }
}

#[async_trait]
impl Admin for FakeAdmin {
    async fn list_topics(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_topics += 1;
        state.calls.total += 1;
        Ok(state.topics.iter().map(|topic| topic.name.clone()).collect())
    }

    async fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_groups += 1;
        state.calls.total += 1;
        Ok(state.groups.clone())
    }

    async fn describe_cluster(&self) -> Result<ClusterInfo> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        Ok(ClusterInfo {
            brokers: vec![BrokerInfo {
                node_id: 0,
                host: "fake".to_string(),
                port: 9092,
            }],
            origin_broker_id: 0,
            origin_broker_name: "fake:9092/0".to_string(),
        })
    }

    async fn fetch_group_offsets(&self, group_id: &str) -> Result<Vec<TopicOffsets>> {
        let mut state = self.state.lock().unwrap();
        state.calls.fetch_group_offsets += 1;
        state.calls.total += 1;
        let mut offsets: Vec<TopicOffsets> = state
            .committed
            .iter()
            .filter(|((group, _), _)| group == group_id)
            .map(|((_, topic), partitions)| TopicOffsets {
                topic: topic.clone(),
                partitions: partitions.clone(),
            })
            .collect();
        offsets.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(offsets)
    }

    async fn offsets_for_timestamp(
        &self,
        topic: &str,
        _timestamp_ms: i64,
    ) -> Result<Vec<PartitionOffset>> {
        let mut state = self.state.lock().unwrap();
        state.calls.offsets_for_timestamp += 1;
        state.calls.total += 1;
        Ok(state.by_timestamp.get(topic).cloned().unwrap_or_default())
    }

    async fn commit_offsets(
        &self,
        group_id: &str,
        topic: &str,
        partitions: &[PartitionOffset],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.commit_offsets += 1;
        state.calls.total += 1;
        state
            .committed
            .insert((group_id.to_string(), topic.to_string()), partitions.to_vec());
        Ok(())
    }

    async fn reset_offsets(&self, group_id: &str, topic: &str, earliest: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.reset_offsets += 1;
        state.calls.total += 1;
        let reset = state
            .topics
            .iter()
            .find(|entry| entry.name == topic)
            .map(|entry| {
                entry
                    .partitions
                    .iter()
                    .map(|partition| PartitionOffset {
                        partition: partition.partition,
                        offset: if earliest {
                            partition.low.to_string()
                        } else {
                            partition.high.to_string()
                        },
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        state
            .committed
            .insert((group_id.to_string(), topic.to_string()), reset);
        Ok(())
    }

    async fn describe_topic(&self, topic: &str) -> Result<TopicDescription> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        state
            .topics
            .iter()
            .find(|entry| entry.name == topic)
            .map(|entry| TopicDescription {
                name: entry.name.clone(),
                partitions: entry
                    .partitions
                    .iter()
                    .map(|partition| PartitionDetail {
                        partition: partition.partition,
                        low: partition.low,
                        high: partition.high,
                        leader: 0,
                        replicas: vec![0],
                        isr: vec![0],
                    })
                    .collect(),
            })
            .ok_or_else(|| AdminError::Topic {
                topic: topic.to_string(),
                message: "no metadata returned".to_string(),
            })
    }

    async fn describe_topic_configs(&self, _topic: &str) -> Result<Vec<ConfigEntryInfo>> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        Ok(Vec::new())
    }

    async fn create_topic(&self, spec: &NewTopicSpec) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        let partitions = (0..spec.num_partitions)
            .map(|partition| FakePartition {
                partition,
                low: 0,
                high: 0,
            })
            .collect();
        state.topics.push(FakeTopic {
            name: spec.name.clone(),
            partitions,
        });
        Ok(())
    }

    async fn delete_topic(&self, topic: &str, _timeout_ms: i32) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        state.topics.retain(|entry| entry.name != topic);
        Ok(())
    }

    async fn delete_topic_records(&self, topic: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.total += 1;
        if let Some(entry) = state.topics.iter_mut().find(|entry| entry.name == topic) {
            for partition in &mut entry.partitions {
                partition.low = partition.high;
            }
        }
        Ok(())
    }
}
