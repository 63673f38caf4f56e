use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fmt;

use crate::http::{CallOptions, OutcomeError, RequestClient, Transport};

/// Identifier of a listed record; APIs use either numbers or strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One record of a listing endpoint such as `/posts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListItem {
    pub id: ItemId,
    pub title: String,
}

/// Renders items as `id: title` lines.
pub fn render_items(items: &[ListItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}: {}\n", item.id, item.title))
        .collect()
}

/// Headline for a failed load, with the HTTP status when there is one.
pub fn failure_summary(error: &OutcomeError) -> String {
    match error.status() {
        Some(status) => format!("Error while fetching data (status: {})", status),
        None => "Error while fetching data".to_string(),
    }
}

/// Fetches the records at `path`.
#[tracing::instrument(skip(client, options))]
pub async fn fetch_items<T: Transport>(
    client: &RequestClient<T>,
    path: &str,
    options: CallOptions,
) -> Result<Vec<ListItem>> {
    let items: Vec<ListItem> = match client.get_as(path, options).await {
        Ok(items) => items,
        Err(e) => {
            let summary = failure_summary(&e);
            return Err(e).context(summary);
        }
    };
    debug!("Fetched {} item(s) from {}", items.len(), path);
    Ok(items)
}

/// Fetch records and print one `id: title` line each.
#[tracing::instrument(skip(client, options))]
pub async fn list<T: Transport>(
    client: &RequestClient<T>,
    path: &str,
    options: CallOptions,
) -> Result<()> {
    let items = fetch_items(client, path, options).await?;
    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }
    print!("{}", render_items(&items));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ClientConfig;

    fn client_for(server: &mockito::Server) -> RequestClient {
        RequestClient::new(ClientConfig::default().with_base_address(server.url()))
    }

    #[test]
    fn test_render_items() {
        let items = vec![
            ListItem {
                id: ItemId::Number(1),
                title: "first".to_string(),
            },
            ListItem {
                id: ItemId::Text("b2".to_string()),
                title: "second".to_string(),
            },
        ];
        assert_eq!(render_items(&items), "1: first\nb2: second\n");
        assert_eq!(render_items(&[]), "");
    }

    #[tokio::test]
    async fn test_fetch_items_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/posts?_limit=2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"title":"a","body":"x"},{"id":2,"title":"b"}]"#)
            .create_async()
            .await;

        let items = fetch_items(&client_for(&server), "/posts?_limit=2", CallOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, ItemId::Number(2));
        assert_eq!(items[1].title, "b");
    }

    #[tokio::test]
    async fn test_fetch_items_not_found_mentions_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wrong-endpoint")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let err = fetch_items(&client_for(&server), "/wrong-endpoint", CallOptions::default())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), "Error while fetching data (status: 404)");
        let outcome = err.downcast_ref::<OutcomeError>().unwrap();
        assert_eq!(outcome.status(), Some(404));
    }

    #[test]
    fn test_failure_summary_without_status() {
        let err = OutcomeError::Timeout {
            timeout: std::time::Duration::from_millis(5),
            url: "u".to_string(),
        };
        assert_eq!(failure_summary(&err), "Error while fetching data");
    }
}
