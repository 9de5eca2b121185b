//! Turning operator intent into concrete per-partition offsets.
//!
//! Three mutually exclusive input channels exist: an ISO-8601 timestamp, a
//! unix-millisecond timestamp, or an explicit `partition=offset` list. All
//! validation and parsing happens here, before any network call.

use chrono::DateTime;
use thiserror::Error;

use crate::{Admin, PartitionOffset};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OffsetTargetError {
    #[error("do not use --timestampISO/--timestampUnix together with --offsets")]
    MutuallyExclusive,

    #[error("choose --timestampISO or --timestampUnix, not both")]
    TimestampFormConflict,

    #[error("choose how to set offsets: --timestampISO, --timestampUnix or --offsets")]
    NoModeChosen,

    #[error("'{0}' is not a valid ISO-8601 timestamp")]
    BadIsoTimestamp(String),

    #[error("'{0}' is not a valid unix millisecond timestamp")]
    BadUnixTimestamp(String),

    #[error("'{0}' is not a valid partition=offset pair")]
    BadPair(String),
}

/// The single active offset-target mode for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetTarget {
    /// Milliseconds since epoch; resolved against the cluster per partition.
    Timestamp(i64),
    /// Operator-supplied pairs, applied verbatim.
    Explicit(Vec<PartitionOffset>),
}

impl OffsetTarget {
    /// Validate mode exclusivity and parse the active mode.
    pub fn from_args(
        iso: Option<&str>,
        unix: Option<&str>,
        offsets: Option<&str>,
    ) -> Result<Self, OffsetTargetError> {
        if (iso.is_some() || unix.is_some()) && offsets.is_some() {
            return Err(OffsetTargetError::MutuallyExclusive);
        }
        if iso.is_some() && unix.is_some() {
            return Err(OffsetTargetError::TimestampFormConflict);
        }
        match (iso, unix, offsets) {
            (Some(iso), _, _) => Ok(Self::Timestamp(parse_iso_ms(iso)?)),
            (_, Some(unix), _) => Ok(Self::Timestamp(parse_unix_ms(unix)?)),
            (_, _, Some(offsets)) => Ok(Self::Explicit(parse_offset_pairs(offsets)?)),
            _ => Err(OffsetTargetError::NoModeChosen),
        }
    }

    /// Compute the concrete per-partition target.
    ///
    /// Timestamp mode queries the cluster and sorts ascending by partition.
    /// Explicit mode keeps the operator's input order untouched.
    pub async fn resolve<A: Admin + ?Sized>(
        &self,
        admin: &A,
        topic: &str,
    ) -> crate::Result<Vec<PartitionOffset>> {
        match self {
            Self::Timestamp(timestamp_ms) => {
                let mut partitions = admin.offsets_for_timestamp(topic, *timestamp_ms).await?;
                partitions.sort_by_key(|entry| entry.partition);
                Ok(partitions)
            }
            Self::Explicit(pairs) => Ok(pairs.clone()),
        }
    }
}

fn parse_iso_ms(value: &str) -> Result<i64, OffsetTargetError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|datetime| datetime.timestamp_millis())
        .map_err(|_| OffsetTargetError::BadIsoTimestamp(value.to_string()))
}

fn parse_unix_ms(value: &str) -> Result<i64, OffsetTargetError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| OffsetTargetError::BadUnixTimestamp(value.to_string()))
}

fn parse_offset_pairs(list: &str) -> Result<Vec<PartitionOffset>, OffsetTargetError> {
    list.split(',')
        .map(|pair| {
            let bad = || OffsetTargetError::BadPair(pair.trim().to_string());
            let (partition, offset) = pair.split_once('=').ok_or_else(bad)?;
            let partition: i32 = partition.trim().parse().map_err(|_| bad())?;
            let offset = offset.trim();
            if offset.is_empty() {
                return Err(bad());
            }
            Ok(PartitionOffset {
                partition,
                offset: offset.to_string(),
            })
        })
        .collect()
}
