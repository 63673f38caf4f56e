//! Failure taxonomy for a single request.

use std::time::Duration;

use serde_json::Value;

use super::transport::TransportError;

/// Body captured from a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; kept as text.
    Text(String),
    /// The body could not be read at all.
    Absent,
}

impl ErrorBody {
    /// Probes a buffered body: JSON first, then text. Never fails.
    pub(crate) fn probe<E>(body: Result<&[u8], E>) -> Self {
        let Ok(bytes) = body else {
            return ErrorBody::Absent;
        };
        match serde_json::from_slice(bytes) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Why a request did not produce decoded content.
#[derive(Debug, thiserror::Error)]
pub enum OutcomeError {
    /// The server answered outside the 2xx range.
    #[error("{}", status_message(.status, .status_text))]
    HttpStatus {
        status: u16,
        status_text: String,
        body: ErrorBody,
        url: String,
    },

    /// The deadline elapsed before the exchange finished.
    #[error("request exceeded {} ms ({url})", millis(.timeout))]
    Timeout { timeout: Duration, url: String },

    /// The transport failed before a usable response arrived.
    #[error("network error: {cause}")]
    Network {
        url: String,
        #[source]
        cause: TransportError,
    },

    /// A 2xx response whose body is not valid JSON.
    #[error("failed to decode JSON from response: {cause}")]
    Decode {
        url: String,
        #[source]
        cause: serde_json::Error,
    },

    /// The payload could not be serialized; nothing was sent.
    #[error("failed to encode request payload: {cause}")]
    Encode {
        url: String,
        #[source]
        cause: serde_json::Error,
    },
}

impl OutcomeError {
    /// Final URL the failed call targeted.
    pub fn url(&self) -> &str {
        match self {
            OutcomeError::HttpStatus { url, .. }
            | OutcomeError::Timeout { url, .. }
            | OutcomeError::Network { url, .. }
            | OutcomeError::Decode { url, .. }
            | OutcomeError::Encode { url, .. } => url,
        }
    }

    /// HTTP status code, only for `HttpStatus`.
    pub fn status(&self) -> Option<u16> {
        match self {
            OutcomeError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, OutcomeError::Timeout { .. })
    }
}

fn millis(timeout: &Duration) -> u128 {
    timeout.as_millis()
}

fn status_message(status: &u16, status_text: &str) -> String {
    format!("HTTP error {} {}", status, status_text)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_prefers_json() {
        let body = ErrorBody::probe::<()>(Ok(&br#"{"error":"missing"}"#[..]));
        assert_eq!(body, ErrorBody::Json(json!({"error": "missing"})));
    }

    #[test]
    fn test_probe_falls_back_to_text() {
        let body = ErrorBody::probe::<()>(Ok(&b"Internal Server Error"[..]));
        assert_eq!(body, ErrorBody::Text("Internal Server Error".to_string()));
    }

    #[test]
    fn test_probe_empty_body_is_empty_text() {
        assert_eq!(
            ErrorBody::probe::<()>(Ok(&b""[..])),
            ErrorBody::Text(String::new())
        );
    }

    #[test]
    fn test_probe_unreadable_body_is_absent() {
        assert_eq!(ErrorBody::probe(Err("stream reset")), ErrorBody::Absent);
    }

    #[test]
    fn test_http_status_display() {
        let err = OutcomeError::HttpStatus {
            status: 404,
            status_text: "Not Found".to_string(),
            body: ErrorBody::Absent,
            url: "https://api.example.com/x".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.url(), "https://api.example.com/x");

        let err = OutcomeError::HttpStatus {
            status: 599,
            status_text: String::new(),
            body: ErrorBody::Absent,
            url: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP error 599");
    }

    #[test]
    fn test_timeout_display() {
        let err = OutcomeError::Timeout {
            timeout: Duration::from_millis(250),
            url: "https://api.example.com/slow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request exceeded 250 ms (https://api.example.com/slow)"
        );
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_keeps_cause() {
        let cause = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = OutcomeError::Decode {
            url: "u".to_string(),
            cause,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("failed to decode JSON"));
    }
}
