use crate::deadline::DeadlineFilter;
use crate::fetcher::Fetcher;
use crate::normalize::{strip_markup, Taxonomy};
use crate::sources::{first_text, SourceAdapter};
use crate::types::{Notice, Result, OPEN_DEADLINE, UNKNOWN_AMOUNT};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// CKAN datastore query endpoint of dati.trentino.it.
const DATASTORE_URL: &str = "https://dati.trentino.it/api/3/action/datastore_search";
/// Resource id of the "bandi di gara" dataset.
const RESOURCE_ID: &str = "e989dd00-c4ce-48a2-88f7-16a0518c026a";
const DEFAULT_ENTITY: &str = "PAT";

/// Adapter for the dati.trentino.it CKAN tabular datastore.
pub struct CkanDatastore {
    url: String,
    resource_id: String,
    rows: usize,
    fetcher: Fetcher,
    taxonomy: Taxonomy,
    filter: DeadlineFilter,
}

impl CkanDatastore {
    pub fn new(fetcher: Fetcher, taxonomy: Taxonomy, filter: DeadlineFilter) -> Self {
        Self {
            url: DATASTORE_URL.to_string(),
            resource_id: RESOURCE_ID.to_string(),
            rows: 300,
            fetcher,
            taxonomy,
            filter,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Map the decoded datastore response to notices. Field names are
    /// source-specific synonyms tried in order, first present wins.
    pub fn map_records(&self, body: &Value) -> Vec<Notice> {
        let records = match body.pointer("/result/records").and_then(Value::as_array) {
            Some(records) => records,
            None => return Vec::new(),
        };

        let mut notices = Vec::new();
        for record in records {
            let title = strip_markup(&first_text(record, &["oggetto"]).unwrap_or_default());
            let deadline = first_text(record, &["scadenza"]).unwrap_or_default();
            if !self.filter.includes(&deadline) {
                continue;
            }

            notices.push(Notice {
                id: first_text(record, &["idGara"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
                tags: self.taxonomy.classify(&title),
                title,
                entity: first_text(record, &["stazioneAppaltante"])
                    .unwrap_or_else(|| DEFAULT_ENTITY.to_string()),
                deadline: if deadline.is_empty() {
                    OPEN_DEADLINE.to_string()
                } else {
                    deadline
                },
                amount: first_text(record, &["importoBaseAsta"])
                    .unwrap_or_else(|| UNKNOWN_AMOUNT.to_string()),
                link: first_text(record, &["urlBando", "urlGara"]).unwrap_or_default(),
            });
        }
        notices
    }
}

#[async_trait]
impl SourceAdapter for CkanDatastore {
    fn source_name(&self) -> &str {
        "dati.trentino.it datastore"
    }

    async fn fetch(&self) -> Result<Vec<Notice>> {
        let query = [
            ("resource_id", self.resource_id.clone()),
            ("limit", self.rows.to_string()),
        ];
        let body = self.fetcher.get_json(&self.url, &query).await?;
        let notices = self.map_records(&body);
        info!("{}: {} notices", self.source_name(), notices.len());
        Ok(notices)
    }
}
