//! Secret fixtures

use rancher_common::{namegen, ObjectMeta, Secret, DESCRIPTION_ANNOTATION};
use std::collections::BTreeMap;

pub const NAMESPACE: &str = "default";
pub const LABEL_KEY: &str = "label1";
pub const LABEL_VAL: &str = "autoLabel";
pub const DESC_KEY: &str = DESCRIPTION_ANNOTATION;
pub const DESC_VAL: &str = "automated secret description";
pub const NAME: &str = "steve-secret";
pub const ANNO_KEY: &str = "anno1";
pub const ANNO_VAL: &str = "automated annotation";
pub const DATA_KEY: &str = "foo";
pub const DATA_VAL: &str = "bar";
pub const UPDATED_ANNO_KEY: &str = "newAnno";
pub const UPDATED_ANNO_VAL: &str = "updated annotation";

fn map_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn secret_labels() -> BTreeMap<String, String> {
    map_of(&[(LABEL_KEY, LABEL_VAL)])
}

/// Annotations the update test replaces the original ones with
pub fn updated_annotations() -> BTreeMap<String, String> {
    map_of(&[(UPDATED_ANNO_KEY, UPDATED_ANNO_VAL), (DESC_KEY, DESC_VAL)])
}

/// Opaque secret named `name` in the test namespace
pub fn secret_template(name: &str) -> Secret {
    let mut metadata = ObjectMeta::namespaced(NAMESPACE, name);
    metadata.annotations = map_of(&[(ANNO_KEY, ANNO_VAL)]);
    metadata.labels = secret_labels();

    Secret::opaque(metadata).with_data(DATA_KEY, DATA_VAL)
}

/// Secret template with a fresh random name
pub fn new_secret_template() -> Secret {
    secret_template(&namegen::append_random_string(NAME))
}

/// Copy of the labels or annotations of a returned object, key for key
pub fn get_secret_labels_and_annotations(actual: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut expected = BTreeMap::new();

    for (key, value) in actual {
        expected.insert(key.clone(), value.clone());
    }

    expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_template() {
        let secret = new_secret_template();

        assert!(secret.metadata.name().starts_with("steve-secret-"));
        assert_eq!(secret.metadata.namespace.as_deref(), Some(NAMESPACE));
        assert_eq!(secret.type_.as_deref(), Some("Opaque"));
        assert_eq!(secret.metadata.labels.get(LABEL_KEY).unwrap(), LABEL_VAL);
        assert_eq!(secret.metadata.annotations.get(ANNO_KEY).unwrap(), ANNO_VAL);
        assert_eq!(secret.data.get(DATA_KEY).unwrap().as_bytes(), DATA_VAL.as_bytes());
    }

    #[test]
    fn test_templates_get_distinct_names() {
        assert_ne!(new_secret_template().metadata.name, new_secret_template().metadata.name);
    }

    #[test]
    fn test_labels_and_annotations_preserve_every_key() {
        let mut actual = updated_annotations();
        actual.insert("cattle.io/creator".to_string(), "norman".to_string());

        let copied = get_secret_labels_and_annotations(&actual);
        assert_eq!(copied, actual);
        assert_eq!(copied.get(DESC_KEY).unwrap(), DESC_VAL);
        assert!(get_secret_labels_and_annotations(&BTreeMap::new()).is_empty());
    }
}
