//! Cluster lookups

use crate::error::{ClientError, Result};
use crate::RancherClient;

/// ID of the management cluster called `name`
pub async fn get_cluster_id_by_name(client: &RancherClient, name: &str) -> Result<String> {
    let clusters = client
        .management()
        .clusters()
        .list(&[("name", name)])
        .await?;

    clusters
        .data
        .into_iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .ok_or_else(|| ClientError::NotFound(format!("cluster {:?} not found", name)))
}
