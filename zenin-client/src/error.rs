use serde_json::Value;
use thiserror::Error;

/// Fallback shown when a request failed without any usable message.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Client-local problems that block an action before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please configure settings and select a data source")]
    MissingConfig,

    #[error("Please configure settings and select a data source")]
    EmptyDataSource,

    #[error("Cannot delete default profile set '{0}'")]
    ProtectedProfileSet(String),

    #[error("No profile set selected")]
    NoSelection,

    #[error("Profile set name cannot be empty")]
    EmptyName,

    #[error("A run is already in progress")]
    SubmissionInFlight,

    #[error("Delete confirmation does not match the selected profile set")]
    StaleDeleteToken,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Unknown level '{0}'")]
    UnknownLevel(String),

    #[error("No profile at row {0}")]
    NoSuchRow(usize),
}

/// A failed backend call.
///
/// `detail` is the structured message from the backend's error body, when
/// there was one. `transport` is the lower-level description of what went
/// wrong (connection failure, non-success status, undecodable body).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.user_message(GENERIC_FAILURE))]
pub struct ApiError {
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub transport: Option<String>,
}

impl ApiError {
    /// The request never produced a usable response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: None,
            transport: Some(message.into()),
        }
    }

    /// Build an error from a non-success response.
    ///
    /// Accepts `{"detail": "..."}` as well as the list form FastAPI uses for
    /// request validation failures (`{"detail": [{"msg": "..."}, ...]}`).
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .and_then(|d| match d {
                Value::Null => None,
                Value::String(s) => Some(s),
                Value::Array(items) => {
                    let msgs: Vec<String> = items
                        .iter()
                        .map(|item| match item.get("msg").and_then(Value::as_str) {
                            Some(msg) => msg.to_string(),
                            None => item.to_string(),
                        })
                        .collect();
                    Some(msgs.join("; "))
                }
                other => Some(other.to_string()),
            })
            .filter(|d| !d.is_empty());

        Self {
            status: Some(status),
            detail,
            transport: Some(format!("Request failed with status code {}", status)),
        }
    }

    /// Message for display: backend detail, then transport message, then
    /// `fallback`, prefixed with `[status]` when a status code is known.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self
            .detail
            .as_deref()
            .or(self.transport.as_deref())
            .unwrap_or(fallback);
        match self.status {
            Some(status) => format!("[{}] {}", status, message),
            None => message.to_string(),
        }
    }

    /// Backend detail if present, otherwise `fallback`. No status prefix.
    pub fn detail_or(&self, fallback: &str) -> String {
        self.detail.clone().unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid API address '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Page-level message, using `fallback` when a backend error carries no text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

impl From<ClientError> for String {
    fn from(err: ClientError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_takes_precedence_with_status_prefix() {
        let err = ApiError::from_response(422, r#"{"detail": "bad window_secs"}"#);
        assert_eq!(err.user_message("Failed to run pipeline"), "[422] bad window_secs");
    }

    #[test]
    fn test_non_json_body_falls_back_to_transport_message() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.detail, None);
        assert_eq!(
            err.user_message("Failed to run pipeline"),
            "[502] Request failed with status code 502"
        );
    }

    #[test]
    fn test_transport_error_has_no_prefix() {
        let err = ApiError::transport("error sending request");
        assert_eq!(err.user_message("x"), "error sending request");
    }

    #[test]
    fn test_generic_fallback_when_nothing_known() {
        let err = ApiError {
            status: None,
            detail: None,
            transport: None,
        };
        assert_eq!(err.user_message("Failed to run pipeline"), "Failed to run pipeline");
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "window_secs"], "msg": "value is not a valid integer", "type": "type_error"},
            {"loc": ["body", "dominance_delta"], "msg": "field required", "type": "missing"}
        ]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(
            err.user_message(""),
            "[422] value is not a valid integer; field required"
        );
    }

    #[test]
    fn test_detail_or_ignores_status() {
        let err = ApiError::from_response(404, r#"{"detail": "Summary file for run x not found"}"#);
        assert_eq!(err.detail_or("Failed to load summary"), "Summary file for run x not found");
        let err = ApiError::transport("boom");
        assert_eq!(err.detail_or("Failed to load summary"), "Failed to load summary");
    }
}
