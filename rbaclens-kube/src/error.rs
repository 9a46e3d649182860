//! Error types for the Kubernetes client

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// API Error Types
// ============================================================================

/// `Status` object returned by the API server on failure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Machine-readable reason such as `Forbidden` or `NotFound`
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub code: u16,
}

// ============================================================================
// Client Error Types
// ============================================================================

/// Errors that can occur when talking to the API server
///
/// None of these are retried by the client. Callers get the first failure.
#[derive(Debug, Error)]
pub enum KubeError {
    /// Credentials missing, invalid or expired (401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authenticated but not allowed to perform the request (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Endpoint or resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as malformed (400, 422)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API server unavailable or failing (429, 5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing server, unreadable kubeconfig, invalid certificate, etc.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl KubeError {
    /// Returns true if the caller's identity was rejected or lacks access
    pub fn is_auth(&self) -> bool {
        matches!(self, KubeError::Authentication(_) | KubeError::Forbidden(_))
    }

    /// Returns true if the request never produced an HTTP response
    pub fn is_network(&self) -> bool {
        matches!(self, KubeError::Network(_))
    }

    /// Classify a `Status` body into an appropriate error variant
    pub fn from_status(status: &ApiStatus, status_code: u16) -> Self {
        let msg = if status.message.is_empty() {
            format!("HTTP {}", status_code)
        } else {
            status.message.clone()
        };

        match (status_code, status.reason.as_str()) {
            (401, _) | (_, "Unauthorized") => KubeError::Authentication(msg),
            (403, _) | (_, "Forbidden") => KubeError::Forbidden(msg),
            (404, _) | (_, "NotFound") => KubeError::NotFound(msg),
            (400, _) | (422, _) | (_, "BadRequest") | (_, "Invalid") => {
                KubeError::InvalidRequest(msg)
            }
            (429, _) | (500..=599, _) | (_, "ServiceUnavailable") | (_, "Timeout") => {
                KubeError::ServiceUnavailable(msg)
            }
            _ => KubeError::Other(msg),
        }
    }

    /// Classify an HTTP error into an appropriate error variant
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KubeError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            KubeError::Network(format!("Connection failed: {}", err))
        } else if err.is_request() {
            KubeError::Network(format!("Request failed: {}", err))
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 => KubeError::Authentication(err.to_string()),
                403 => KubeError::Forbidden(err.to_string()),
                429 | 500..=599 => KubeError::ServiceUnavailable(err.to_string()),
                _ => KubeError::Other(err.to_string()),
            }
        } else {
            KubeError::Other(err.to_string())
        }
    }
}

/// Build an error from a non-success response body
pub(crate) fn parse_error_response(body: &str, status_code: u16) -> KubeError {
    if let Ok(status) = serde_json::from_str::<ApiStatus>(body) {
        if status.kind == "Status" {
            return KubeError::from_status(&status, status_code);
        }
    }

    let fallback = ApiStatus {
        message: body.trim().to_string(),
        ..Default::default()
    };
    KubeError::from_status(&fallback, status_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(reason: &str, message: &str) -> ApiStatus {
        ApiStatus {
            kind: "Status".to_string(),
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: reason.to_string(),
            code: 0,
        }
    }

    // ===== from_status Tests =====

    #[test]
    fn test_from_status_by_code() {
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 401),
            KubeError::Authentication(_)
        ));
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 403),
            KubeError::Forbidden(_)
        ));
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 404),
            KubeError::NotFound(_)
        ));
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 422),
            KubeError::InvalidRequest(_)
        ));
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 503),
            KubeError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            KubeError::from_status(&status("", "x"), 418),
            KubeError::Other(_)
        ));
    }

    #[test]
    fn test_from_status_by_reason() {
        let err = KubeError::from_status(&status("Forbidden", "no access"), 200);
        assert!(matches!(err, KubeError::Forbidden(ref m) if m == "no access"));

        let err = KubeError::from_status(&status("Timeout", "slow"), 200);
        assert!(matches!(err, KubeError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_status_empty_message_uses_code() {
        let err = KubeError::from_status(&status("", ""), 500);
        assert_eq!(err.to_string(), "Service unavailable: HTTP 500");
    }

    // ===== parse_error_response Tests =====

    #[test]
    fn test_parse_status_body() {
        let body = r#"{
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": "selfsubjectrulesreviews.authorization.k8s.io is forbidden",
            "reason": "Forbidden",
            "code": 403
        }"#;
        let err = parse_error_response(body, 403);
        assert!(err.is_auth());
        assert!(err.to_string().contains("is forbidden"));
    }

    #[test]
    fn test_parse_plain_text_body() {
        let err = parse_error_response("Unauthorized\n", 401);
        assert!(matches!(err, KubeError::Authentication(ref m) if m == "Unauthorized"));
    }

    #[test]
    fn test_parse_json_that_is_not_a_status() {
        let err = parse_error_response(r#"{"kind":"Pod"}"#, 404);
        assert!(matches!(err, KubeError::NotFound(_)));
    }

    #[test]
    fn test_is_network() {
        assert!(KubeError::Network("refused".into()).is_network());
        assert!(!KubeError::Other("x".into()).is_network());
    }
}
