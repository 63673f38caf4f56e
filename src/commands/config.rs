use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::http::{CallOptions, ClientConfig, RequestClient};

/// Settings shared by every subcommand, collected from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Raw `Name: value` header strings.
    pub headers: Vec<String>,
}

impl Config {
    /// Builds the client-wide defaults, rejecting malformed headers.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default().with_headers(parse_headers(&self.headers)?);

        if let Some(base) = self.base_url.as_deref().filter(|b| !b.is_empty()) {
            debug!("Using base address {}", base);
            config = config.with_base_address(base);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(positive_timeout(ms)?);
        }

        Ok(config)
    }

    pub fn client(&self) -> Result<RequestClient> {
        Ok(RequestClient::new(self.client_config()?))
    }
}

/// Per-call overrides given on a single subcommand.
pub fn call_options(timeout_ms: Option<u64>) -> Result<CallOptions> {
    let mut options = CallOptions::new();
    if let Some(ms) = timeout_ms {
        options = options.with_timeout(positive_timeout(ms)?);
    }
    Ok(options)
}

fn positive_timeout(ms: u64) -> Result<Duration> {
    if ms == 0 {
        bail!("Timeout must be a positive number of milliseconds");
    }
    Ok(Duration::from_millis(ms))
}

/// Parses `Name: value` pairs; later entries replace earlier ones of the same name.
pub fn parse_headers(raw: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once(':') else {
            bail!("Invalid header '{}': expected 'Name: value'", entry);
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name in '{}'", entry))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid header value in '{}'", entry))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DEFAULT_TIMEOUT;

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(&[
            "Accept: application/json".to_string(),
            "X-Trace-Id:abc".to_string(),
        ])
        .unwrap();
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["x-trace-id"], "abc");
    }

    #[test]
    fn test_parse_headers_last_wins() {
        let headers =
            parse_headers(&["accept: a".to_string(), "ACCEPT: b".to_string()]).unwrap();
        assert_eq!(headers.get_all("accept").iter().count(), 1);
        assert_eq!(headers["accept"], "b");
    }

    #[test]
    fn test_parse_headers_rejects_malformed() {
        assert!(parse_headers(&["no-colon".to_string()]).is_err());
        assert!(parse_headers(&["bad name: x".to_string()]).is_err());
        assert!(parse_headers(&["x: line\nbreak".to_string()]).is_err());
    }

    #[test]
    fn test_client_config_from_settings() {
        let config = Config {
            base_url: Some("https://jsonplaceholder.typicode.com".to_string()),
            timeout_ms: Some(1500),
            headers: vec!["Accept: application/json".to_string()],
        };

        let client_config = config.client_config().unwrap();
        assert_eq!(
            client_config.base_address.as_deref(),
            Some("https://jsonplaceholder.typicode.com")
        );
        assert_eq!(client_config.timeout, Duration::from_millis(1500));
        assert_eq!(client_config.headers["accept"], "application/json");
    }

    #[test]
    fn test_client_config_defaults() {
        let client_config = Config::default().client_config().unwrap();
        assert_eq!(client_config.base_address, None);
        assert_eq!(client_config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_empty_base_url_is_ignored() {
        let config = Config {
            base_url: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(config.client_config().unwrap().base_address, None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            timeout_ms: Some(0),
            ..Config::default()
        };
        assert!(config.client_config().is_err());
        assert!(call_options(Some(0)).is_err());
        assert_eq!(
            call_options(Some(20)).unwrap().timeout,
            Some(Duration::from_millis(20))
        );
    }

    #[tokio::test]
    async fn test_configured_headers_reach_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("x-client", "ajax")
            .with_status(200)
            .with_body("\"pong\"")
            .create_async()
            .await;

        let config = Config {
            base_url: Some(server.url()),
            timeout_ms: None,
            headers: vec!["X-Client: ajax".to_string()],
        };
        let value = config
            .client()
            .unwrap()
            .get("/ping", CallOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value, serde_json::json!("pong"));
    }
}
