//! Typed entities, inputs and list primitives for all admin collections.

pub mod auth;
pub mod blog;
pub mod certification;
pub mod comment;
pub mod contact;
pub mod dashboard;
pub mod education;
pub mod experience;
pub mod media;
pub mod newsletter;
pub mod pagination;
pub mod project;
pub mod query;
pub mod settings;
pub mod skill;
pub mod testimonial;
pub mod user;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::FetchError;

/// A collection item addressable by its server-assigned `_id`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Overlay the server's returned fields onto an item.
///
/// The server's values always win; fields the server did not return are kept.
pub fn apply_patch<T: Entity>(item: &T, patch: &Map<String, Value>) -> Result<T, FetchError> {
    let mut value = serde_json::to_value(item)?;
    let Value::Object(fields) = &mut value else {
        return Err(FetchError::Decode("entity did not serialize to an object".to_string()));
    };
    for (k, v) in patch {
        fields.insert(k.clone(), v.clone());
    }
    Ok(serde_json::from_value(value)?)
}

/// Untyped collection item, for callers that do not know the entity type up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl Entity for Record {
    fn id(&self) -> &str {
        self.0.get("_id").and_then(Value::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_reads_underscore_id() {
        let record: Record = serde_json::from_value(json!({"_id": "abc", "name": "x"})).unwrap();
        assert_eq!(record.id(), "abc");
        assert_eq!(Record::default().id(), "");
    }

    #[test]
    fn apply_patch_prefers_server_values() {
        let record: Record =
            serde_json::from_value(json!({"_id": "s1", "isActive": true, "name": "Rust"})).unwrap();
        let patch = json!({"_id": "s1", "isActive": false})
            .as_object()
            .cloned()
            .unwrap();
        let patched = apply_patch(&record, &patch).unwrap();
        assert_eq!(patched.get("isActive"), Some(&json!(false)));
        assert_eq!(patched.get("name"), Some(&json!("Rust")));
    }
}
