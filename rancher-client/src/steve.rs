//! Steve API (`/v1`) client
//!
//! Objects created through a [`SteveTypeClient`] are registered on the
//! client's session, which deletes them again on cleanup.

use crate::error::Result;
use crate::session::Session;
use crate::transport::Transport;
use rancher_common::{SteveCollection, SteveObject};
use serde::Serialize;

/// Query parameters for Steve list calls
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub limit: Option<u32>,
    pub continue_token: Option<String>,
}

impl ListParams {
    pub fn labels(selector: &str) -> Self {
        Self {
            label_selector: Some(selector.to_string()),
            ..Default::default()
        }
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(selector) = &self.label_selector {
            query.push(("labelSelector", selector.clone()));
        }
        if let Some(selector) = &self.field_selector {
            query.push(("fieldSelector", selector.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(token) = &self.continue_token {
            query.push(("continue", token.clone()));
        }
        query
    }
}

#[derive(Clone)]
pub struct SteveClient {
    transport: Transport,
    prefix: String,
    session: Session,
}

impl SteveClient {
    pub(crate) fn new(transport: Transport, session: Session) -> Self {
        Self {
            transport,
            prefix: "v1".to_string(),
            session,
        }
    }

    /// Steve API of a downstream cluster, proxied through Rancher
    pub fn proxy_downstream(&self, cluster_id: &str) -> SteveClient {
        Self {
            transport: self.transport.clone(),
            prefix: format!("k8s/clusters/{}/v1", cluster_id),
            session: self.session.clone(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn steve_type(&self, type_: &str) -> SteveTypeClient {
        SteveTypeClient {
            transport: self.transport.clone(),
            collection: format!("{}/{}", self.prefix, type_),
            session: self.session.clone(),
        }
    }
}

/// CRUD operations on a single Steve resource type
#[derive(Clone)]
pub struct SteveTypeClient {
    transport: Transport,
    collection: String,
    session: Session,
}

impl SteveTypeClient {
    /// Collection path, e.g. `v1/secret`
    pub fn collection_path(&self) -> &str {
        &self.collection
    }

    fn object_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }

    pub async fn create<T: Serialize + ?Sized>(&self, object: &T) -> Result<SteveObject> {
        let created: SteveObject = self.transport.post(&self.collection, object).await?;
        tracing::debug!(id = %created.id, collection = %self.collection, "Created object");

        let transport = self.transport.clone();
        let path = created
            .link("remove")
            .map(str::to_string)
            .unwrap_or_else(|| self.object_path(&created.id));
        let registered = self.session.register_cleanup(move || async move {
            match transport.delete(&path).await {
                Err(e) if e.is_not_found() => Ok(()),
                other => other,
            }
        });
        if let Err(e) = registered {
            tracing::warn!(id = %created.id, error = %e, "Created object is not tracked for cleanup");
        }

        Ok(created)
    }

    /// Replace `existing` with `updated`. `updated` must carry the current resourceVersion.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        existing: &SteveObject,
        updated: &T,
    ) -> Result<SteveObject> {
        let path = existing
            .link("update")
            .map(str::to_string)
            .unwrap_or_else(|| self.object_path(&existing.id));
        self.transport.put(&path, updated).await
    }

    pub async fn delete(&self, existing: &SteveObject) -> Result<()> {
        let path = existing
            .link("remove")
            .map(str::to_string)
            .unwrap_or_else(|| self.object_path(&existing.id));
        self.transport.delete(&path).await
    }

    pub async fn by_id(&self, id: &str) -> Result<SteveObject> {
        self.transport.get(&self.object_path(id), &[]).await
    }

    pub async fn list(&self, params: &ListParams) -> Result<SteveCollection> {
        self.transport
            .get(&self.collection, &params.to_query())
            .await
    }

    pub async fn list_namespaced(&self, namespace: &str, params: &ListParams) -> Result<SteveCollection> {
        self.transport
            .get(&self.object_path(namespace), &params.to_query())
            .await
    }
}
