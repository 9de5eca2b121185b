//! Cluster broker overview.

use anyhow::Result;
use kafka_admin::Admin;

pub async fn describe<A: Admin + ?Sized>(admin: &A) -> Result<()> {
    let info = admin.describe_cluster().await?;
    log::info!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
