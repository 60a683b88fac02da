use crate::config::Config;
use crate::error::ProxyError;
use serde::Deserialize;
use serde_json::{json, Value};

pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion caps `page_size` at 100.
const PAGE_SIZE: u32 = 100;
/// Stops a misbehaving cursor from looping forever.
const MAX_PAGES: usize = 50;

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Body for `POST /databases/{id}/query`.
pub fn query_body(order_property: &str, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "sorts": [{ "property": order_property, "direction": "ascending" }],
        "page_size": PAGE_SIZE,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

#[derive(Clone)]
pub struct NotionApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
    database_id: String,
    order_property: String,
    max_pages: usize,
}

impl NotionApi {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self::with_base_url(http, config, NOTION_API_BASE)
    }

    pub fn with_base_url(http: reqwest::Client, config: &Config, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.notion_token.clone(),
            database_id: config.database_id.clone(),
            order_property: config.order_property.clone(),
            max_pages: MAX_PAGES,
        }
    }

    #[cfg(test)]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn query_url(&self) -> String {
        format!("{}/databases/{}/query", self.base_url, self.database_id)
    }

    async fn query_page(&self, cursor: Option<&str>) -> Result<QueryPage, ProxyError> {
        let res = self
            .http
            .post(self.query_url())
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&query_body(&self.order_property, cursor))
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<NotionErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ProxyError::Decode(e.to_string()))
    }

    /// Every page of the database, in ascending ordinal order. Fails rather
    /// than returning a partial list when the page cap is hit.
    pub async fn list_all(&self) -> Result<Vec<Value>, ProxyError> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..self.max_pages {
            let page = self.query_page(cursor.as_deref()).await?;
            results.extend(page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => return Ok(results),
            }
        }

        Err(ProxyError::Truncated {
            pages: self.max_pages,
        })
    }
}
