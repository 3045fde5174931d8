//! Secret resource

use crate::{ByteString, ObjectMeta, SteveResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SECRET_TYPE_OPAQUE: &str = "Opaque";

/// Kubernetes Secret in its Steve representation.
///
/// Steve reserves the top-level `type` key for its own resource type, so the
/// Kubernetes secret type travels as `_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(rename = "_type", alias = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, ByteString>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
}

impl Secret {
    /// An empty `Opaque` secret
    pub fn opaque(metadata: ObjectMeta) -> Self {
        Self {
            metadata,
            type_: Some(SECRET_TYPE_OPAQUE.to_string()),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<ByteString>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

impl SteveResource for Secret {
    const STEVE_TYPE: &'static str = "secret";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}
