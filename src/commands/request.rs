use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::http::{CallOptions, RequestClient, Transport};

/// HTTP verb exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// Parses `--data` as JSON.
pub fn parse_payload(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON payload: {}", raw))
}

/// Issues one request and returns its decoded content.
#[tracing::instrument(skip(client, payload, options))]
pub async fn send<T: Transport>(
    client: &RequestClient<T>,
    verb: Verb,
    path: &str,
    payload: Option<&Value>,
    options: CallOptions,
) -> Result<Value> {
    debug!("{:?} {} payload={}", verb, path, payload.is_some());

    let outcome = match (verb, payload) {
        (Verb::Get, _) => client.get(path, options).await,
        (Verb::Delete, _) => client.delete(path, options).await,
        (Verb::Post, Some(payload)) => client.post(path, payload, options).await,
        (Verb::Put, Some(payload)) => client.put(path, payload, options).await,
        (Verb::Post | Verb::Put, None) => {
            anyhow::bail!("{:?} requires a payload (--data)", verb)
        }
    };

    outcome.with_context(|| format!("{:?} {} failed", verb, path))
}

/// Issue one request and print the decoded content as pretty JSON.
#[tracing::instrument(skip(client, payload, options))]
pub async fn request<T: Transport>(
    client: &RequestClient<T>,
    verb: Verb,
    path: &str,
    payload: Option<&str>,
    options: CallOptions,
) -> Result<()> {
    let payload = payload.map(parse_payload).transpose()?;
    let value = send(client, verb, path, payload.as_ref(), options).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
