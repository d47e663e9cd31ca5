use thiserror::Error;

/// Failures surfaced by the users API client and the detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached at all.
    #[error("Network error: Please check if the API server is running.")]
    Network { detail: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The requested user is in neither the cache nor the server's answer.
    #[error("User {id} not found")]
    NotFound { id: String },

    /// The body could not be decoded into the expected shape.
    #[error("Failed to parse {what}: {message}")]
    Decode { what: &'static str, message: String },
}

impl ApiError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    /// Builds an `Http` error with `HTTP Error {status}: {reason}` as message.
    ///
    /// `fallback` is used when the status has no canonical reason phrase.
    pub fn http(status: u16, reason: Option<&str>, fallback: &str) -> Self {
        let reason = reason.filter(|r| !r.is_empty()).unwrap_or(fallback);
        Self::Http {
            status,
            message: format!("HTTP Error {status}: {reason}"),
        }
    }

    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            message: err.to_string(),
        }
    }

    /// HTTP status carried by this error, if it came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_points_at_server() {
        let err = ApiError::network("connection refused");
        assert_eq!(
            err.to_string(),
            "Network error: Please check if the API server is running."
        );
    }

    #[test]
    fn test_http_message_uses_reason_or_fallback() {
        let err = ApiError::http(503, Some("Service Unavailable"), "Failed to fetch users");
        assert_eq!(err.to_string(), "HTTP Error 503: Service Unavailable");
        assert_eq!(err.status(), Some(503));

        let err = ApiError::http(599, None, "Failed to fetch users");
        assert_eq!(err.to_string(), "HTTP Error 599: Failed to fetch users");
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::NotFound { id: "12".into() };
        assert_eq!(err.to_string(), "User 12 not found");
        assert_eq!(err.status(), None);
    }
}
