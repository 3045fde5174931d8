//! Fake server state
//!
//! `ObjectStore` keeps Steve objects per resource type, keyed by Steve id,
//! and applies the server-side bookkeeping a real API server would:
//! uid, resourceVersion, creationTimestamp and optimistic concurrency.

use crate::error::{FakeError, FakeResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rancher_common::{namegen, Cluster, SteveCollection, SteveObject};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::{Mutex, RwLock};

/// A request seen by the fake server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
}

/// Shared state of a running fake
pub struct FakeState {
    pub token: String,
    pub clusters: Vec<Cluster>,
    pub objects: RwLock<ObjectStore>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    pub fn new(token: String, clusters: Vec<Cluster>, base_url: String) -> Self {
        Self {
            token,
            clusters,
            objects: RwLock::new(ObjectStore::new(base_url)),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectStore {
    base_url: String,
    revision: u64,
    objects: BTreeMap<String, BTreeMap<String, SteveObject>>,
}

fn not_found(type_: &str, name: &str) -> FakeError {
    FakeError::NotFound(format!("{}s \"{}\" not found", type_, name))
}

impl ObjectStore {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    fn next_revision(&mut self) -> String {
        self.revision += 1;
        self.revision.to_string()
    }

    fn links(&self, type_: &str, id: &str) -> BTreeMap<String, String> {
        let url = format!("{}/v1/{}/{}", self.base_url, type_, id);
        ["self", "update", "remove"]
            .into_iter()
            .map(|name| (name.to_string(), url.clone()))
            .collect()
    }

    pub fn len(&self, type_: &str) -> usize {
        self.objects.get(type_).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.values().all(BTreeMap::is_empty)
    }

    pub fn create(&mut self, type_: &str, mut object: SteveObject) -> FakeResult<SteveObject> {
        let namespace = object
            .metadata
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| FakeError::Invalid("metadata.namespace: Required value".to_string()))?;

        let name = match (object.metadata.name.clone(), object.metadata.generate_name.clone()) {
            (Some(name), _) if !name.is_empty() => name,
            (_, Some(prefix)) if !prefix.is_empty() => {
                format!("{}{}", prefix, namegen::random_string_lower(namegen::SUFFIX_LENGTH))
            }
            _ => {
                return Err(FakeError::Invalid(
                    "metadata.name: Required value: name or generateName is required".to_string(),
                ))
            }
        };

        let id = format!("{}/{}", namespace, name);
        if self
            .objects
            .get(type_)
            .is_some_and(|objects| objects.contains_key(&id))
        {
            return Err(FakeError::AlreadyExists(format!(
                "{}s \"{}\" already exists",
                type_, name
            )));
        }

        if type_ == "secret" {
            fold_string_data(&mut object);
        }

        object.metadata.name = Some(name);
        object.metadata.uid = Some(uuid::Uuid::new_v4().to_string());
        object.metadata.resource_version = Some(self.next_revision());
        object.metadata.creation_timestamp = Some(chrono::Utc::now());
        object.type_ = type_.to_string();
        object.links = self.links(type_, &id);
        object.id = id.clone();

        self.objects
            .entry(type_.to_string())
            .or_default()
            .insert(id, object.clone());

        Ok(object)
    }

    pub fn get(&self, type_: &str, namespace: &str, name: &str) -> FakeResult<SteveObject> {
        self.objects
            .get(type_)
            .and_then(|objects| objects.get(&format!("{}/{}", namespace, name)))
            .cloned()
            .ok_or_else(|| not_found(type_, name))
    }

    pub fn update(
        &mut self,
        type_: &str,
        namespace: &str,
        name: &str,
        mut object: SteveObject,
    ) -> FakeResult<SteveObject> {
        let existing = self.get(type_, namespace, name)?;

        if object.metadata.resource_version != existing.metadata.resource_version {
            return Err(FakeError::Conflict(format!(
                "Operation cannot be fulfilled on {}s \"{}\": the object has been modified; \
                 please apply your changes to the latest version and try again",
                type_, name
            )));
        }

        if type_ == "secret" {
            fold_string_data(&mut object);
        }

        object.id = existing.id.clone();
        object.type_ = existing.type_.clone();
        object.links = existing.links.clone();
        object.metadata.name = existing.metadata.name.clone();
        object.metadata.namespace = existing.metadata.namespace.clone();
        object.metadata.uid = existing.metadata.uid.clone();
        object.metadata.creation_timestamp = existing.metadata.creation_timestamp;
        object.metadata.resource_version = Some(self.next_revision());

        self.objects
            .entry(type_.to_string())
            .or_default()
            .insert(existing.id, object.clone());

        Ok(object)
    }

    pub fn delete(&mut self, type_: &str, namespace: &str, name: &str) -> FakeResult<SteveObject> {
        self.objects
            .get_mut(type_)
            .and_then(|objects| objects.remove(&format!("{}/{}", namespace, name)))
            .ok_or_else(|| not_found(type_, name))
    }

    pub fn list(
        &self,
        type_: &str,
        namespace: Option<&str>,
        label_selector: Option<&str>,
        limit: Option<usize>,
    ) -> FakeResult<SteveCollection> {
        let selector = label_selector.map(LabelSelector::parse).transpose()?;

        let data: Vec<SteveObject> = self
            .objects
            .get(type_)
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter(|o| namespace.map_or(true, |ns| o.namespace() == Some(ns)))
            .filter(|o| selector.as_ref().map_or(true, |s| s.matches(&o.metadata.labels)))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(SteveCollection {
            type_: "collection".to_string(),
            revision: Some(self.revision.to_string()),
            continue_token: None,
            data,
        })
    }
}

/// Merge `stringData` into base64 `data` the way the API server does for secrets
fn fold_string_data(object: &mut SteveObject) {
    let Some(Value::Object(string_data)) = object.fields.remove("stringData") else {
        return;
    };

    let data = object
        .fields
        .entry("data")
        .or_insert_with(|| Value::Object(Default::default()));
    if let Value::Object(data) = data {
        for (key, value) in string_data {
            if let Value::String(plain) = value {
                data.insert(key, Value::String(STANDARD.encode(plain.as_bytes())));
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    DoesNotExist(String),
}

/// Equality-based label selector: `a=b,c!=d,e,!f`
#[derive(Debug, PartialEq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    pub fn parse(selector: &str) -> FakeResult<Self> {
        let mut requirements = Vec::new();
        for term in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some((key, value)) = term.split_once("!=") {
                Requirement::NotEquals(key.trim().to_string(), value.trim().to_string())
            } else if let Some((key, value)) = term.split_once("==") {
                Requirement::Equals(key.trim().to_string(), value.trim().to_string())
            } else if let Some((key, value)) = term.split_once('=') {
                Requirement::Equals(key.trim().to_string(), value.trim().to_string())
            } else if let Some(key) = term.strip_prefix('!') {
                Requirement::DoesNotExist(key.trim().to_string())
            } else {
                Requirement::Exists(term.to_string())
            };

            let key = match &requirement {
                Requirement::Equals(k, _)
                | Requirement::NotEquals(k, _)
                | Requirement::Exists(k)
                | Requirement::DoesNotExist(k) => k,
            };
            if key.is_empty() {
                return Err(FakeError::Invalid(format!("invalid label selector {:?}", selector)));
            }

            requirements.push(requirement);
        }

        Ok(Self { requirements })
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| match r {
            Requirement::Equals(k, v) => labels.get(k) == Some(v),
            Requirement::NotEquals(k, v) => labels.get(k) != Some(v),
            Requirement::Exists(k) => labels.contains_key(k),
            Requirement::DoesNotExist(k) => !labels.contains_key(k),
        })
    }
}
