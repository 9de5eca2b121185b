//! Consumer group listing.

use anyhow::Result;
use kafka_admin::Admin;

pub async fn list<A: Admin + ?Sized>(admin: &A) -> Result<()> {
    let groups = admin.list_groups().await?;
    for group in &groups {
        log::info!(
            "groupId: {}, protocolType: {}",
            group.group_id,
            group.protocol_type
        );
    }
    Ok(())
}
