//! The network capability the request client is built on.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::{Client, Method, Version, header::HeaderMap};

use super::config::TransportOptions;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A transport-level failure: DNS, refused connection, TLS, reset stream.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::with_source(error.to_string(), error)
    }
}

/// One outgoing request, fully composed.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub options: TransportOptions,
}

/// A response whose body has been buffered once so it can be read any
/// number of times.
#[derive(Debug)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    /// `Err` when the body stream failed after the head arrived.
    pub body: std::result::Result<Bytes, TransportError>,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Ok(body.into()),
        }
    }
}

/// Performs a single HTTP exchange. Cancellation is by dropping the future.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// `Transport` backed by a `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);

        for (key, value) in &request.options {
            match key.as_str() {
                "version" => {
                    let version = parse_version(value).map_err(|e| {
                        TransportError::new(format!("invalid transport option: {}", e))
                    })?;
                    builder = builder.version(version);
                }
                other => debug!("Ignoring unsupported transport option '{}'", other),
            }
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("Received {} from {}", status, response.url());

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: response.bytes().await.map_err(TransportError::from),
        })
    }
}

fn parse_version(value: &serde_json::Value) -> Result<Version> {
    let Some(name) = value.as_str() else {
        bail!("version must be a string, got {}", value);
    };
    match name.to_ascii_uppercase().as_str() {
        "HTTP/1.0" => Ok(Version::HTTP_10),
        "HTTP/1.1" => Ok(Version::HTTP_11),
        "HTTP/2" | "HTTP/2.0" => Ok(Version::HTTP_2),
        _ => Err(anyhow!("unknown HTTP version '{}'", name)),
    }
}
