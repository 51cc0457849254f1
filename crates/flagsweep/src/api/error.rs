//! Flag API error types.

use thiserror::Error;

/// Errors that can occur when talking to the flag service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side configuration problem (empty token, bad host).
    #[error("configuration error: {0}")]
    Config(String),

    /// The service answered with a non-success status.
    ///
    /// The status code is carried structurally so call sites classify by
    /// number, never by matching on message text.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status behind this error, if it has one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a 404 (never retried, meaningful absence on lookups).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether this is a 429 rate-limit response.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// Build the error for a non-success response status.
///
/// The message embeds the code, its canonical reason phrase, and guidance
/// for the statuses operators hit most.
#[must_use]
pub fn classify_status(status: u16) -> ApiError {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");

    let guidance = match status {
        401 => " (check that the access token has read and write access to the project)",
        404 => " (the requested resource may not exist)",
        _ => "",
    };

    ApiError::Status {
        status,
        message: format!("API request failed with HTTP {status} {reason}{guidance}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_message_embeds_code_and_reason() {
        let err = classify_status(500);
        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
    }

    #[test]
    fn unauthorized_carries_permission_guidance() {
        let msg = classify_status(401).to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("read and write access"));
    }

    #[test]
    fn not_found_carries_existence_guidance_and_predicate() {
        let err = classify_status(404);
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());
        assert!(err.to_string().contains("may not exist"));
    }

    #[test]
    fn rate_limited_predicate_matches_429_only() {
        assert!(classify_status(429).is_rate_limited());
        assert!(!classify_status(503).is_rate_limited());
        assert!(!ApiError::Network("reset".to_string()).is_rate_limited());
    }

    #[test]
    fn non_status_errors_have_no_code() {
        assert_eq!(ApiError::Config("empty token".to_string()).status(), None);
        assert_eq!(ApiError::Network("boom".to_string()).status(), None);
    }
}
