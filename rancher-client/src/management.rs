//! Norman management API (`/v3`)

use crate::error::Result;
use crate::transport::Transport;
use rancher_common::{Cluster, Collection};

#[derive(Clone)]
pub struct ManagementClient {
    transport: Transport,
}

impl ManagementClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn clusters(&self) -> ClusterClient<'_> {
        ClusterClient {
            transport: &self.transport,
        }
    }
}

/// Operations on `/v3/clusters`
pub struct ClusterClient<'a> {
    transport: &'a Transport,
}

impl ClusterClient<'_> {
    /// List clusters, filtered by exact field matches such as `("name", "local")`
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Collection<Cluster>> {
        let query: Vec<(&str, String)> = filters
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        self.transport.get("v3/clusters", &query).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Cluster> {
        self.transport
            .get(&format!("v3/clusters/{}", id), &[])
            .await
    }
}
