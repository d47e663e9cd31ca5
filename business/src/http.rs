//! Thin HTTP layer over `reqwest`.
//!
//! Responses are read fully into a [`Response`] that only holds owned data, so
//! callers can inspect the status before deciding how to decode the body.
//! Any failure before a status line arrives (connection refused, DNS, reset
//! while reading the body) is reported as an [`HttpError`].

use serde::de::DeserializeOwned;
use thiserror::Error;

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for `status`, when there is one
    pub reason: Option<&'static str>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure: no usable response was received.
#[derive(Debug, Clone, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// A GET request under construction.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    url: String,
    query: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Append a query parameter. Parameters are sent in insertion order.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub async fn send(self) -> HttpResult<Response> {
        let mut request = self.client.get(&self.url);
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        // Extract status before consuming the response
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status: status.as_u16(),
            reason: status.canonical_reason(),
            body,
        })
    }
}

/// Shared HTTP client. Cloning is cheap and reuses the connection pool.
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            client: self.inner.clone(),
            url: url.into(),
            query: Vec::new(),
        }
    }
}
