//! Common types shared between rancher-client, rancher-fake and the validation suites

pub mod management;
pub mod namegen;
pub mod secret;
pub mod steve;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use management::{Cluster, Collection};
pub use secret::{Secret, SECRET_TYPE_OPAQUE};
pub use steve::{SteveCollection, SteveError, SteveObject, SteveResource};

/// Annotation Rancher uses to store the human readable description of an object
pub const DESCRIPTION_ANNOTATION: &str = "field.cattle.io/description";

/// Errors raised while converting between wire representations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} did not serialize to a JSON object")]
    NotAnObject(String),

    #[error("Conversion error: {0}")]
    Conversion(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Kubernetes object metadata as returned by the Steve API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
    /// Keys not modelled above (ownerReferences, generation, managedFields,
    /// Steve's state and relationships), carried through updates unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectMeta {
    /// Metadata for a namespaced object
    pub fn namespaced(namespace: &str, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Steve ID of the object: `namespace/name`, or just `name` when cluster scoped
    pub fn steve_id(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}/{}", ns, self.name()),
            _ => self.name().to_string(),
        }
    }

    /// Value of the Rancher description annotation
    pub fn description(&self) -> Option<&str> {
        self.annotations
            .get(DESCRIPTION_ANNOTATION)
            .map(String::as_str)
    }
}

/// Opaque bytes carried as a base64 string on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for ByteString {
    fn from(value: &str) -> Self {
        ByteString(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        ByteString(value)
    }
}

impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(ByteString)
            .map_err(serde::de::Error::custom)
    }
}
