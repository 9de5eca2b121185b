//! Display a consumer group's offsets per partition.

use anyhow::Result;
use kafka_admin::{Admin, TopicOffsets};

/// Fetch all offsets for the group, optionally restricted to a
/// comma-separated topic list. Filtering happens after the fetch, so a
/// filter naming an unknown topic simply yields an empty result.
pub async fn run<A: Admin + ?Sized>(
    admin: &A,
    group_id: &str,
    topics: Option<&str>,
) -> Result<Vec<TopicOffsets>> {
    let filter: Vec<&str> = topics
        .map(|list| list.split(',').collect())
        .unwrap_or_default();

    let mut offsets = admin.fetch_group_offsets(group_id).await?;
    if !filter.is_empty() {
        offsets.retain(|entry| filter.contains(&entry.topic.as_str()));
    }
    for entry in &mut offsets {
        entry.partitions.sort_by_key(|partition| partition.partition);
    }

    log::info!("{}", serde_json::to_string_pretty(&offsets)?);
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_admin::fake::FakeAdmin;
    use pretty_assertions::assert_eq;

    fn admin() -> FakeAdmin {
        FakeAdmin::new()
            .with_committed("g1", "t1", &[(2, "30"), (0, "10"), (1, "20")])
            .with_committed("g1", "t2", &[(0, "5")])
            .with_committed("g2", "t1", &[(0, "1")])
    }

    #[tokio::test]
    async fn partitions_are_sorted_ascending_within_each_topic() {
        let offsets = run(&admin(), "g1", None).await.unwrap();

        assert_eq!(offsets.len(), 2);
        let t1 = offsets.iter().find(|entry| entry.topic == "t1").unwrap();
        assert_eq!(
            t1.partitions
                .iter()
                .map(|entry| entry.partition)
                .collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[tokio::test]
    async fn topic_filter_restricts_the_result_set() {
        let offsets = run(&admin(), "g1", Some("t2")).await.unwrap();

        assert_eq!(offsets.len(), 1);
        assert_eq!(offsets[0].topic, "t2");
    }

    #[tokio::test]
    async fn filter_on_missing_topic_yields_empty_without_error() {
        // topic existence is never checked here; the filter just matches nothing
        let offsets = run(&admin(), "g1", Some("missing-topic")).await.unwrap();
        assert_eq!(offsets, Vec::<TopicOffsets>::new());
    }

    #[tokio::test]
    async fn other_groups_offsets_are_not_included() {
        let offsets = run(&admin(), "g2", None).await.unwrap();
        assert_eq!(offsets.len(), 1);
        assert_eq!(offsets[0].partitions[0].offset, "1");
    }
}
