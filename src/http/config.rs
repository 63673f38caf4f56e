//! Client-wide defaults, per-call overrides, and the merge between them.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Default request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Extra transport-level settings, handed to the transport verbatim.
pub type TransportOptions = serde_json::Map<String, Value>;

/// Defaults shared by every call made through one `RequestClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prefix for relative paths.
    pub base_address: Option<String>,
    pub timeout: Duration,
    pub headers: HeaderMap,
    pub transport_options: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_address: None,
            timeout: DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            transport_options: TransportOptions::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = Some(base_address.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        overlay_headers(&mut self.headers, &headers);
        self
    }

    pub fn with_transport_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.transport_options.insert(key.into(), value);
        self
    }
}

/// Overrides for a single call. Unset fields fall back to the client defaults.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub base_address: Option<String>,
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub transport_options: Option<TransportOptions>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = Some(base_address.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        self
    }

    pub fn with_transport_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.transport_options
            .get_or_insert_with(TransportOptions::new)
            .insert(key.into(), value);
        self
    }
}

/// Configuration in force for exactly one call.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub base_address: Option<String>,
    pub timeout: Duration,
    pub headers: HeaderMap,
    pub transport_options: TransportOptions,
}

/// Merges client defaults with per-call overrides. Call values win on every
/// field; header names collide case-insensitively. Neither input is touched.
pub fn merge_options(global: &ClientConfig, call: &CallOptions) -> EffectiveConfig {
    let mut headers = global.headers.clone();
    if let Some(call_headers) = &call.headers {
        overlay_headers(&mut headers, call_headers);
    }

    let mut transport_options = global.transport_options.clone();
    if let Some(call_options) = &call.transport_options {
        for (key, value) in call_options {
            transport_options.insert(key.clone(), value.clone());
        }
    }

    EffectiveConfig {
        base_address: call
            .base_address
            .clone()
            .or_else(|| global.base_address.clone()),
        timeout: call.timeout.unwrap_or(global.timeout),
        headers,
        transport_options,
    }
}

/// Replaces every value of each name present in `overrides`, keeping
/// multi-valued overrides intact.
fn overlay_headers(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
        for value in overrides.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}
