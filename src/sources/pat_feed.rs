use crate::deadline::DeadlineFilter;
use crate::fetcher::Fetcher;
use crate::normalize::{strip_markup, Taxonomy};
use crate::sources::SourceAdapter;
use crate::types::{AggregatorError, Notice, Result, OPEN_DEADLINE, UNKNOWN_AMOUNT};
use async_trait::async_trait;
use regex::Regex;
use tracing::info;

/// RSS feed of the PAT transparency portal.
const FEED_URL: &str =
    "https://provinciaditrento.portaleamministrazionetrasparente.it/feeds/bandigara";
const ENTITY: &str = "Provincia Autonoma di Trento (PAT)";

/// Adapter for the PAT "amministrazione trasparente" RSS feed.
///
/// The feed carries only titles and links; the deadline, when present, is
/// embedded in the title as a labeled date and recovered by regex.
pub struct PatFeed {
    url: String,
    limit: usize,
    fetcher: Fetcher,
    taxonomy: Taxonomy,
    filter: DeadlineFilter,
    deadline_re: Regex,
}

impl PatFeed {
    pub fn new(fetcher: Fetcher, taxonomy: Taxonomy, filter: DeadlineFilter) -> Self {
        Self {
            url: FEED_URL.to_string(),
            limit: 50,
            fetcher,
            taxonomy,
            filter,
            deadline_re: Regex::new(r"(?i)scadenza:?\s*(\d{2}/\d{2}/\d{4})")
                .expect("deadline pattern"),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Recover a labeled deadline from a feed title, e.g.
    /// "Gara lavori - scadenza: 31/12/2025".
    pub fn deadline_from_title(&self, title: &str) -> Option<String> {
        self.deadline_re
            .captures(title)
            .map(|caps| caps[1].to_string())
    }

    /// Parse raw feed XML and map its entries, taking at most `limit`.
    pub fn map_content(&self, content: &str) -> Result<Vec<Notice>> {
        let feed = feed_rs::parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("feed parse failed: {}", e)))?;

        let mut notices = Vec::new();
        for entry in feed.entries.into_iter().take(self.limit) {
            let title = strip_markup(&entry.title.map(|t| t.content).unwrap_or_default());
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_else(|| entry.id.clone());
            let deadline = self
                .deadline_from_title(&title)
                .unwrap_or_else(|| OPEN_DEADLINE.to_string());
            if !self.filter.includes(&deadline) {
                continue;
            }

            notices.push(Notice {
                id: link.clone(),
                tags: self.taxonomy.classify(&title),
                title,
                entity: ENTITY.to_string(),
                deadline,
                amount: UNKNOWN_AMOUNT.to_string(),
                link,
            });
        }
        Ok(notices)
    }
}

#[async_trait]
impl SourceAdapter for PatFeed {
    fn source_name(&self) -> &str {
        "Trasparenza PAT feed"
    }

    async fn fetch(&self) -> Result<Vec<Notice>> {
        let content = self.fetcher.get_text(&self.url).await?;
        let notices = self.map_content(&content)?;
        info!("{}: {} notices", self.source_name(), notices.len());
        Ok(notices)
    }
}
