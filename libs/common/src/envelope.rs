//! Uniform response envelope returned by every community operation
//!
//! An envelope is either a success carrying `data` or a failure carrying an
//! `error` message. The fields are public for wire compatibility, but the
//! constructors are the only way this crate builds one, so the invariant
//! `success == data.is_some() == error.is_none()` holds for every envelope
//! produced here.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{CommunityError, CommunityResult};

/// Result envelope wrapping an operation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying an error message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert an internal result into an envelope.
    ///
    /// Failures are logged here, expected ones at debug level; an error whose message is empty is replaced by
    /// `fallback` so a failed envelope never carries an empty string.
    pub fn from_result(result: CommunityResult<T>, fallback: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let message = e.to_string();
                if e.is_expected() {
                    tracing::debug!("{}: {}", fallback, message);
                } else if message.is_empty() {
                    tracing::error!("{}", fallback);
                } else {
                    tracing::error!("{}: {}", fallback, message);
                }

                if message.is_empty() {
                    Self::err(fallback)
                } else {
                    Self::err(message)
                }
            }
        }
    }

    /// True when the envelope carries data and no error
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Turn the envelope back into a `Result`.
    ///
    /// Malformed envelopes (success without data, failure without a message)
    /// are reported as unexpected errors.
    pub fn into_result(self) -> CommunityResult<T> {
        match (self.success, self.data, self.error) {
            (true, Some(data), None) => Ok(data),
            (false, _, Some(message)) => Err(CommunityError::from_message(message)),
            _ => Err(CommunityError::Unexpected(
                "Malformed response envelope".to_string(),
            )),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Decode the payload of an envelope received over the wire.
    ///
    /// A success without `data` decodes from JSON `null`, which is how
    /// acknowledgements (`ApiResponse<()>`) travel.
    pub fn decode<T: DeserializeOwned>(self) -> CommunityResult<ApiResponse<T>> {
        if !self.success {
            let message = self
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Request failed".to_string());
            return Ok(ApiResponse::err(message));
        }

        let value = self.data.unwrap_or(serde_json::Value::Null);
        let data = serde_json::from_value(value)?;
        Ok(ApiResponse::ok(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_serializes_without_error() {
        let envelope = ApiResponse::ok(42);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_err_envelope_serializes_without_data() {
        let envelope: ApiResponse<u32> = ApiResponse::err("Not implemented");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Not implemented"}));
    }

    #[test]
    fn test_from_result_uses_fallback_for_empty_message() {
        let envelope: ApiResponse<()> = ApiResponse::from_result(
            Err(CommunityError::Unexpected(String::new())),
            "Failed to get posts",
        );
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Failed to get posts"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_from_result_keeps_error_message() {
        let envelope: ApiResponse<()> =
            ApiResponse::from_result(Err(CommunityError::Unauthenticated), "Failed to create post");
        assert_eq!(envelope.error.as_deref(), Some("User not authenticated"));
    }

    #[test]
    fn test_decode_acknowledgement_from_null() {
        let raw: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"success": true, "data": null})).unwrap();
        let envelope: ApiResponse<()> = raw.decode().unwrap();
        assert_eq!(envelope, ApiResponse::ok(()));
    }

    #[test]
    fn test_decode_failure_keeps_message() {
        let raw: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"success": false, "error": "Not implemented"})).unwrap();
        let envelope: ApiResponse<String> = raw.decode().unwrap();
        assert_eq!(envelope, ApiResponse::err("Not implemented"));
    }

    #[test]
    fn test_into_result_rejects_malformed_envelope() {
        let envelope: ApiResponse<u32> = ApiResponse {
            success: true,
            data: None,
            error: None,
        };
        assert!(matches!(
            envelope.into_result(),
            Err(CommunityError::Unexpected(_))
        ));
    }
}
