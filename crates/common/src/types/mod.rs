use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform JSON envelope returned by every data endpoint.
///
/// `success` is the only reliable outcome signal: store failures are reported
/// here with HTTP 200, not through the status code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None, error: None }
    }

    /// Failed response with an error string and no data.
    pub fn error(error: impl Into<String>) -> Self {
        Self { success: false, data: None, message: None, error: Some(error.into()) }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl ApiResponse<()> {
    /// Successful response that only carries a confirmation message.
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()), error: None }
    }

    /// Rejection carrying only a message (used by the auth gate).
    pub fn denied(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()), error: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_skips_absent_fields() {
        let v = serde_json::to_value(ApiResponse::message("Successfully deleted")).unwrap();
        assert_eq!(v, json!({"success": true, "message": "Successfully deleted"}));

        let v = serde_json::to_value(ApiResponse::<()>::error("not found")).unwrap();
        assert_eq!(v, json!({"success": false, "error": "not found"}));
    }

    #[test]
    fn envelope_keeps_null_data_when_present_but_empty() {
        // get-by-id with no match still reports data: null
        let v = serde_json::to_value(ApiResponse::ok(Option::<u32>::None)).unwrap();
        assert_eq!(v, json!({"success": true, "data": null}));
    }
}
