use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// An offered consulting service as stored in the `services` collection.
///
/// `name` and `date` are the only fields the API depends on; everything else
/// the client sends (price, image, description...) is kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisaService {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Epoch milliseconds; listings are ordered newest first on this field.
    #[serde(deserialize_with = "crate::date::deserialize_millis")]
    pub date: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Insert payload: same shape as [`VisaService`] minus the store-assigned id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewVisaService {
    pub name: String,
    pub date: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewVisaService {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        if self.extra.contains_key("_id") {
            return Err(ModelError::Validation("_id is assigned by the store".into()));
        }
        Ok(())
    }

    pub fn into_service(self, id: String) -> VisaService {
        VisaService { id: Some(id), name: self.name, date: self.date, extra: self.extra }
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}
