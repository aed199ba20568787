use crate::deadline::DeadlineFilter;
use crate::fetcher::Fetcher;
use crate::normalize::{strip_markup, Taxonomy};
use crate::sources::{text_value, SourceAdapter};
use crate::types::{Notice, Result, OPEN_DEADLINE, UNKNOWN_AMOUNT};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// Open-data content-search endpoint of the Comune di Trento.
const SEARCH_URL: &str = "https://www.comune.trento.it/api/opendata/v2/content/search";
const ENTITY: &str = "Comune di Trento";

/// Adapter for the Comune di Trento JSON API.
pub struct TrentoApi {
    url: String,
    page_size: usize,
    fetcher: Fetcher,
    taxonomy: Taxonomy,
    filter: DeadlineFilter,
}

impl TrentoApi {
    pub fn new(fetcher: Fetcher, taxonomy: Taxonomy, filter: DeadlineFilter) -> Self {
        Self {
            url: SEARCH_URL.to_string(),
            page_size: 200,
            fetcher,
            taxonomy,
            filter,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Map the decoded search response to notices. Pure over the payload:
    /// items outside the deadline window are dropped, missing fields fall
    /// back per the canonical record rules.
    pub fn map_items(&self, body: &Value) -> Vec<Notice> {
        let items = match body.get("items").and_then(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        };

        let mut notices = Vec::new();
        for item in items {
            let properties = item.get("properties");
            let title = strip_markup(item.get("title").and_then(Value::as_str).unwrap_or(""));
            let deadline =
                text_value(properties.and_then(|p| p.get("dataScadenza"))).unwrap_or_default();
            if !self.filter.includes(&deadline) {
                continue;
            }

            let amount = text_value(properties.and_then(|p| p.get("importoBase")))
                .unwrap_or_else(|| UNKNOWN_AMOUNT.to_string());
            let link = text_value(item.get("url"))
                .or_else(|| text_value(item.get("id")))
                .unwrap_or_default();

            notices.push(Notice {
                id: text_value(item.get("uid")).unwrap_or_else(|| Uuid::new_v4().to_string()),
                tags: self.taxonomy.classify(&title),
                title,
                entity: ENTITY.to_string(),
                deadline: if deadline.is_empty() {
                    OPEN_DEADLINE.to_string()
                } else {
                    deadline
                },
                amount,
                link,
            });
        }
        notices
    }
}

#[async_trait]
impl SourceAdapter for TrentoApi {
    fn source_name(&self) -> &str {
        "Comune di Trento API"
    }

    async fn fetch(&self) -> Result<Vec<Notice>> {
        let query = [
            ("classes", "bando".to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        let body = self.fetcher.get_json(&self.url, &query).await?;
        let notices = self.map_items(&body);
        info!("{}: {} notices", self.source_name(), notices.len());
        Ok(notices)
    }
}
