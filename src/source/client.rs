//! monday.com GraphQL client
//!
//! Fetches one items page per call and classifies failures:
//! - body that is not JSON or not an items page → `Error::Parse`
//! - `errors` / `error_message` in the body → `Error::Upstream`
//! - no `data.boards[0].items_page` → `Error::Upstream`

use super::types::ItemsPage;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::PageSource;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;

/// Default monday.com GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.monday.com/v2";

/// Items-page query with the display values of relation-like columns
pub const ITEMS_PAGE_QUERY: &str = r"
query ($board_id: ID!, $limit: Int!, $cursor: String) {
  boards(ids: [$board_id]) {
    items_page(limit: $limit, cursor: $cursor) {
      cursor
      items {
        id
        name
        column_values {
          id
          type
          text
          value
          column {
            title
          }
          ... on MirrorValue { display_value }
          ... on BoardRelationValue { display_value }
          ... on DependencyValue { display_value }
          ... on SubtasksValue { display_value }
        }
      }
    }
  }
}
";

/// Client for the monday.com items-page API
#[derive(Debug)]
pub struct MondayClient {
    http: HttpClient,
    endpoint: String,
}

impl MondayClient {
    /// Create a client posting to `endpoint`
    ///
    /// The HTTP client is expected to carry the `Authorization` header.
    pub fn new(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageSource for MondayClient {
    async fn fetch_page(
        &self,
        board_id: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage> {
        let body = json!({
            "query": ITEMS_PAGE_QUERY,
            "variables": {
                "board_id": board_id,
                "limit": limit,
                "cursor": cursor,
            }
        });

        let response = self.http.post_json(&self.endpoint, &body).await?;
        let text = response.text().await?;
        parse_items_page(&text)
    }
}

/// Parse a raw items-page response body
pub fn parse_items_page(body: &str) -> Result<ItemsPage> {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::parse(format!("Response is not valid JSON: {e}")))?;

    if let Some(errors) = value.get("errors") {
        return Err(Error::upstream(pretty(errors)));
    }

    if let Some(message) = value.get("error_message") {
        return Err(Error::upstream(pretty(message)));
    }

    let page = value
        .get("data")
        .and_then(|d| d.get("boards"))
        .and_then(JsonValue::as_array)
        .and_then(|boards| boards.first())
        .and_then(|board| board.get("items_page"))
        .ok_or_else(|| Error::upstream(format!("Unexpected response shape: {}", pretty(&value))))?;

    serde_json::from_value(page.clone())
        .map_err(|e| Error::parse(format!("Malformed items page: {e}")))
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
