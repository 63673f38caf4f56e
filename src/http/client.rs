//! JSON request client with per-call deadlines and a typed failure taxonomy.

use bytes::Bytes;
use log::debug;
use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::config::{CallOptions, ClientConfig, merge_options};
use super::error::{ErrorBody, OutcomeError};
use super::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
use super::url::build_url;

/// Issues JSON requests against an optional base address.
///
/// Each call merges the client defaults with its own `CallOptions`, races the
/// exchange against its own deadline, and yields either decoded content or
/// exactly one `OutcomeError`. Calls share nothing but the read-only config.
pub struct RequestClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl RequestClient<ReqwestTransport> {
    /// Creates a client over a default reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::default())
    }
}

impl Default for RequestClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> RequestClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn get(&self, path: &str, options: CallOptions) -> Result<Value, OutcomeError> {
        self.request::<()>(Method::GET, path, None, options).await
    }

    /// GET, deserializing the decoded content into `R`.
    #[tracing::instrument(skip(self, options))]
    pub async fn get_as<R: DeserializeOwned>(
        &self,
        path: &str,
        options: CallOptions,
    ) -> Result<R, OutcomeError> {
        let url = self.final_url(path, &options);
        let value = self.get(path, options).await?;
        serde_json::from_value(value).map_err(|cause| OutcomeError::Decode { url, cause })
    }

    #[tracing::instrument(skip(self, payload, options))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
        options: CallOptions,
    ) -> Result<Value, OutcomeError> {
        self.request(Method::POST, path, Some(payload), options)
            .await
    }

    #[tracing::instrument(skip(self, payload, options))]
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
        options: CallOptions,
    ) -> Result<Value, OutcomeError> {
        self.request(Method::PUT, path, Some(payload), options)
            .await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn delete(&self, path: &str, options: CallOptions) -> Result<Value, OutcomeError> {
        self.request::<()>(Method::DELETE, path, None, options)
            .await
    }

    fn final_url(&self, path: &str, options: &CallOptions) -> String {
        let base = options
            .base_address
            .as_deref()
            .or(self.config.base_address.as_deref());
        build_url(path, base)
    }

    /// Shared executor behind every verb. `payload` of `None` means no body.
    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        options: CallOptions,
    ) -> Result<Value, OutcomeError> {
        let effective = merge_options(&self.config, &options);
        let url = build_url(path, effective.base_address.as_deref());
        let mut headers = effective.headers;

        let body = match payload {
            Some(payload) => {
                let encoded = serde_json::to_vec(payload).map_err(|cause| {
                    OutcomeError::Encode {
                        url: url.clone(),
                        cause,
                    }
                })?;
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Some(Bytes::from(encoded))
            }
            None => {
                // A bodyless request never declares a content type.
                headers.remove(CONTENT_TYPE);
                None
            }
        };

        let request = TransportRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body,
            options: effective.transport_options,
        };

        debug!("{} {} (timeout {:?})...", method, url, effective.timeout);

        // Dropping the losing side cancels the exchange or disarms the timer.
        let response = match tokio::time::timeout(effective.timeout, self.transport.send(request))
            .await
        {
            Err(_elapsed) => {
                debug!("{} {} timed out after {:?}", method, url, effective.timeout);
                return Err(OutcomeError::Timeout {
                    timeout: effective.timeout,
                    url,
                });
            }
            Ok(Err(cause)) => {
                debug!("{} {} failed: {}", method, url, cause);
                return Err(OutcomeError::Network { url, cause });
            }
            Ok(Ok(response)) => response,
        };

        classify(response, url)
    }
}

/// Maps a settled response onto decoded content or an `OutcomeError`.
fn classify(response: TransportResponse, url: String) -> Result<Value, OutcomeError> {
    let TransportResponse {
        status,
        status_text,
        body,
    } = response;

    if !(200..300).contains(&status) {
        let body = ErrorBody::probe(body.as_deref());
        debug!("HTTP {} from {}: {:?}", status, url, body);
        return Err(OutcomeError::HttpStatus {
            status,
            status_text,
            body,
            url,
        });
    }

    // No Content / Reset Content carry nothing to decode.
    if status == 204 || status == 205 {
        return Ok(Value::Null);
    }

    let bytes = body.map_err(|cause| OutcomeError::Network {
        url: url.clone(),
        cause,
    })?;

    serde_json::from_slice(&bytes).map_err(|cause| OutcomeError::Decode { url, cause })
}
