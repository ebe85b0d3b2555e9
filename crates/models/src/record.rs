use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// A patient health record, the single entity this system stores.
///
/// Serialized camelCase to match the wire format. The three content fields
/// are caller-supplied free text and serialize as `null` until set. Unknown
/// fields from the caller's JSON body are absorbed via `extra` rather than
/// dropped, so a stored record round-trips whatever the client sent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment_plan: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthRecord {
    /// Build a record from its open JSON-map form. Fails when the document
    /// is missing `id`/`createdAt` or carries values of the wrong shape
    /// (e.g. a caller overrode `createdAt` with a non-timestamp).
    pub fn from_document(doc: Map<String, Value>) -> Result<Self, ModelError> {
        serde_json::from_value(Value::Object(doc)).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Flatten the record into a field-name -> JSON-value map, the form
    /// partial updates merge into.
    pub fn to_document(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(other) => Err(ModelError::Malformed(format!(
                "record serialized to non-object JSON: {}",
                other
            ))),
            Err(e) => Err(ModelError::Malformed(e.to_string())),
        }
    }
}
