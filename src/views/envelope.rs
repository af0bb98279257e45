use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Wire format of every API answer: `{"success", "data"?, "error"?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    /// Success without a `data` key
    pub fn empty() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }

    pub fn with_status(self, status: StatusCode) -> Response {
        (status, self).into_response()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_keys_are_omitted() {
        assert_eq!(serde_json::to_value(Envelope::empty()).unwrap(), json!({ "success": true }));
        assert_eq!(
            serde_json::to_value(Envelope::failure("Not Allowed")).unwrap(),
            json!({ "success": false, "error": "Not Allowed" })
        );
        assert_eq!(
            serde_json::to_value(Envelope::success(json!([1, 2]))).unwrap(),
            json!({ "success": true, "data": [1, 2] })
        );
    }

    #[test]
    fn null_data_is_still_data() {
        assert_eq!(
            serde_json::to_value(Envelope::success(Value::Null)).unwrap(),
            json!({ "success": true, "data": null })
        );
    }
}
