use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::visa_service::validate_name;

/// A user's review of a service, stored in the `reviews` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_name: String,
    pub email: String,
    /// Hex id of the reviewed service, kept as a plain string.
    pub service_id: String,
    #[serde(deserialize_with = "crate::date::deserialize_millis")]
    pub date: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub user_name: String,
    pub email: String,
    pub service_id: String,
    pub date: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_user_name(&self.user_name)?;
        validate_email(&self.email)?;
        if self.service_id.trim().is_empty() {
            return Err(ModelError::Validation("service_id required".into()));
        }
        reject_reserved(&self.extra)
    }

    pub fn into_review(self, id: String) -> Review {
        Review {
            id: Some(id),
            user_name: self.user_name,
            email: self.email,
            service_id: self.service_id,
            date: self.date,
            extra: self.extra,
        }
    }
}

/// Partial update merged into an existing review (`$set` semantics).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.email.is_none()
            && self.service_id.is_none()
            && self.date.is_none()
            && self.extra.is_empty()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::Validation("nothing to update".into()));
        }
        if let Some(name) = &self.user_name {
            validate_user_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(sid) = &self.service_id {
            if sid.trim().is_empty() {
                return Err(ModelError::Validation("service_id required".into()));
            }
        }
        reject_reserved(&self.extra)
    }
}

impl Review {
    /// Overwrite every field present in `patch`; absent fields are untouched.
    pub fn apply(&mut self, patch: &ReviewPatch) {
        if let Some(v) = &patch.user_name {
            self.user_name = v.clone();
        }
        if let Some(v) = &patch.email {
            self.email = v.clone();
        }
        if let Some(v) = &patch.service_id {
            self.service_id = v.clone();
        }
        if let Some(v) = patch.date {
            self.date = v;
        }
        for (k, v) in &patch.extra {
            self.extra.insert(k.clone(), v.clone());
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

fn validate_user_name(name: &str) -> Result<(), ModelError> {
    validate_name(name).map_err(|_| ModelError::Validation("user_name required".into()))
}

fn reject_reserved(extra: &Map<String, Value>) -> Result<(), ModelError> {
    if extra.contains_key("_id") {
        return Err(ModelError::Validation("_id is assigned by the store".into()));
    }
    Ok(())
}
