//! Steve API envelope types
//!
//! Steve wraps every Kubernetes object in a JSON document carrying its
//! resource `type`, a Steve `id` and a set of action `links`. The object
//! body (metadata, data, spec, status, ...) sits next to them at the top level.

use crate::{Error, ObjectMeta, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A typed resource that can be sent through the Steve API
pub trait SteveResource: Serialize + DeserializeOwned {
    /// Steve resource type, e.g. `secret`
    const STEVE_TYPE: &'static str;

    fn metadata(&self) -> &ObjectMeta;
}

/// Generic Steve object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteveObject {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Every other top-level field of the object
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SteveObject {
    /// Wrap a typed resource for submission to Steve
    pub fn from_resource<T: SteveResource>(resource: &T) -> Result<Self> {
        let value = serde_json::to_value(resource)?;
        let Value::Object(mut fields) = value else {
            return Err(Error::NotAnObject(T::STEVE_TYPE.to_string()));
        };

        let metadata: ObjectMeta = match fields.remove("metadata") {
            Some(meta) => serde_json::from_value(meta)?,
            None => ObjectMeta::default(),
        };

        Ok(Self {
            id: metadata.steve_id(),
            type_: T::STEVE_TYPE.to_string(),
            links: BTreeMap::new(),
            metadata,
            fields,
        })
    }

    /// Convert the object body into a typed resource
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        let mut fields = self.fields;
        fields.insert("metadata".to_string(), serde_json::to_value(self.metadata)?);
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Typed conversion without consuming the object
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        self.clone().into_typed()
    }

    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }
}

/// Steve list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteveCollection {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
    #[serde(default)]
    pub data: Vec<SteveObject>,
}

/// Error document returned by Steve and Norman
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteveError {
    #[serde(rename = "type", default)]
    pub type_: String,
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl SteveError {
    pub fn new(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            type_: "error".to_string(),
            status,
            code: code.to_string(),
            message: message.into(),
        }
    }
}
