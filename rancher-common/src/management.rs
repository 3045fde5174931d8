//! Norman (`/v3`) management types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Management cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_cluster_type")]
    pub type_: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

fn default_cluster_type() -> String {
    "cluster".to_string()
}

impl Cluster {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            type_: default_cluster_type(),
            state: "active".to_string(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Norman collection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "type", default = "default_collection_type")]
    pub type_: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn default_collection_type() -> String {
    "collection".to_string()
}

impl<T> Collection<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            type_: default_collection_type(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_collection() {
        let collection: Collection<Cluster> = serde_json::from_value(json!({
            "type": "collection",
            "data": [
                {"id": "c-m-abc12", "name": "downstream", "state": "active", "driver": "imported"},
                {"id": "local", "name": "local", "state": "provisioning"}
            ]
        }))
        .unwrap();

        assert_eq!(collection.data.len(), 2);
        assert!(collection.data[0].is_active());
        assert!(!collection.data[1].is_active());
        assert_eq!(collection.data[0].type_, "cluster");
    }
}
