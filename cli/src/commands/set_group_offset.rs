//! Set a consumer group's offsets from a timestamp or an explicit list.

use anyhow::Result;
use kafka_admin::offsets::OffsetTarget;
use kafka_admin::{group_exists, topic_exists, Admin, PartitionOffset};
use serde_json::json;

/// Which path the command took; warnings all finish the command cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(Vec<PartitionOffset>),
    DryRun(Vec<PartitionOffset>),
    InvalidTarget,
    TopicMissing,
    GroupMissing,
}

pub async fn run<A: Admin + ?Sized>(
    admin: &A,
    opts: &args::SetGroupOffsetArgs,
) -> Result<Outcome> {
    // Mode validation happens before anything touches the network.
    let target = match OffsetTarget::from_args(
        opts.timestamp_iso.as_deref(),
        opts.timestamp_unix.as_deref(),
        opts.offsets.as_deref(),
    ) {
        Ok(target) => target,
        Err(err) => {
            log::error!("{err}");
            return Ok(Outcome::InvalidTarget);
        }
    };

    if !topic_exists(admin, &opts.topic).await? {
        log::warn!("topic {} does not exist", opts.topic);
        return Ok(Outcome::TopicMissing);
    }
    if !group_exists(admin, &opts.group_id).await? {
        log::warn!("groupId '{}' does not exist", opts.group_id);
        return Ok(Outcome::GroupMissing);
    }

    let partitions = target.resolve(admin, &opts.topic).await?;
    let payload = json!({
        "groupId": opts.group_id,
        "topic": opts.topic,
        "partitions": partitions,
    });

    if opts.dry {
        log::info!(
            "setOffsets will be applied with: {}",
            serde_json::to_string_pretty(&payload)?
        );
        return Ok(Outcome::DryRun(partitions));
    }

    admin
        .commit_offsets(&opts.group_id, &opts.topic, &partitions)
        .await?;
    log::info!(
        "offsets applied: {}",
        serde_json::to_string_pretty(&payload)?
    );
    Ok(Outcome::Applied(partitions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_admin::fake::FakeAdmin;
    use pretty_assertions::assert_eq;

    fn opts(
        iso: Option<&str>,
        unix: Option<&str>,
        offsets: Option<&str>,
        dry: bool,
    ) -> args::SetGroupOffsetArgs {
        args::SetGroupOffsetArgs {
            group_id: "g1".into(),
            topic: "t1".into(),
            timestamp_iso: iso.map(str::to_string),
            timestamp_unix: unix.map(str::to_string),
            offsets: offsets.map(str::to_string),
            dry,
        }
    }

    fn cluster() -> FakeAdmin {
        FakeAdmin::new()
            .with_topic("t1", &[(0, 0, 100), (1, 0, 100), (2, 0, 100)])
            .with_group("g1")
            .with_timestamp_offsets("t1", &[(2, "30"), (0, "10"), (1, "20")])
    }

    #[tokio::test]
    async fn conflicting_modes_make_zero_network_calls() {
        let admin = cluster();
        let outcome = run(
            &admin,
            &opts(Some("2023-01-01T00:00:00Z"), None, Some("0=1"), false),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::InvalidTarget);
        assert_eq!(admin.calls().total, 0);
    }

    #[tokio::test]
    async fn missing_mode_makes_zero_network_calls() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, None, None, false)).await.unwrap();

        assert_eq!(outcome, Outcome::InvalidTarget);
        assert_eq!(admin.calls().total, 0);
    }

    #[tokio::test]
    async fn malformed_pairs_make_zero_network_calls() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, None, Some("x=1"), false))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::InvalidTarget);
        assert_eq!(admin.calls().total, 0);
    }

    #[tokio::test]
    async fn missing_topic_warns_and_stops() {
        let admin = FakeAdmin::new().with_group("g1");
        let outcome = run(&admin, &opts(None, None, Some("0=1"), false))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::TopicMissing);
        let calls = admin.calls();
        assert_eq!(calls.list_groups, 0);
        assert_eq!(calls.commit_offsets, 0);
    }

    #[tokio::test]
    async fn missing_group_warns_and_stops() {
        let admin = FakeAdmin::new().with_topic("t1", &[(0, 0, 100)]);
        let outcome = run(&admin, &opts(None, None, Some("0=1"), false))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::GroupMissing);
        assert_eq!(admin.calls().commit_offsets, 0);
    }

    #[tokio::test]
    async fn dry_run_never_commits_in_timestamp_mode() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, Some("1000"), None, true))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::DryRun(_)));
        let calls = admin.calls();
        assert_eq!(calls.offsets_for_timestamp, 1);
        assert_eq!(calls.commit_offsets, 0);
    }

    #[tokio::test]
    async fn dry_run_never_commits_in_explicit_mode() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, None, Some("0=5,1=6"), true))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::DryRun(_)));
        assert_eq!(admin.calls().commit_offsets, 0);
    }

    #[tokio::test]
    async fn timestamp_mode_applies_partitions_sorted_ascending() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, Some("1000"), None, false))
            .await
            .unwrap();

        let Outcome::Applied(partitions) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(
            partitions
                .iter()
                .map(|entry| entry.partition)
                .collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        let committed = admin.committed("g1", "t1").unwrap();
        assert_eq!(committed, partitions);
    }

    #[tokio::test]
    async fn explicit_mode_preserves_input_order() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, None, Some("2=100,0=50"), false))
            .await
            .unwrap();

        let Outcome::Applied(partitions) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(
            partitions
                .iter()
                .map(|entry| (entry.partition, entry.offset.as_str()))
                .collect::<Vec<_>>(),
            vec![(2, "100"), (0, "50")]
        );
        assert_eq!(admin.committed("g1", "t1").unwrap(), partitions);
    }

    #[tokio::test]
    async fn sentinel_offsets_pass_through_as_literals() {
        let admin = cluster();
        let outcome = run(&admin, &opts(None, None, Some("0=-1"), false))
            .await
            .unwrap();

        let Outcome::Applied(partitions) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(partitions[0].offset, "-1");
    }
}
