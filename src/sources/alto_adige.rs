use crate::deadline::DeadlineFilter;
use crate::fetcher::Fetcher;
use crate::normalize::Taxonomy;
use crate::sources::SourceAdapter;
use crate::types::{Notice, Result, OPEN_DEADLINE, UNKNOWN_AMOUNT};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

const BASE_URL: &str = "https://www.bandi-altoadige.it/";
const ENTITY: &str = "Provincia Autonoma di Bolzano / Altri";
const SEARCH_TERM: &str = "eventi";
/// Bound on concurrent page fetches against the portal.
const PAGE_CONCURRENCY: usize = 3;

/// Adapter for the paginated Alto Adige bandi portal.
///
/// The listing is scraped page by page; a page that fails to fetch
/// contributes zero cards and the remaining pages are still processed.
pub struct AltoAdigeListing {
    base_url: String,
    pages: u32,
    fetcher: Fetcher,
    taxonomy: Taxonomy,
    filter: DeadlineFilter,
    card: Selector,
    heading: Selector,
    anchor: Selector,
    deadline: Selector,
}

impl AltoAdigeListing {
    pub fn new(fetcher: Fetcher, taxonomy: Taxonomy, filter: DeadlineFilter) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            pages: 1,
            fetcher,
            taxonomy,
            filter,
            card: Selector::parse("div.bando-card").expect("card selector"),
            heading: Selector::parse("h2").expect("heading selector"),
            anchor: Selector::parse("a").expect("anchor selector"),
            deadline: Selector::parse("span[data-field='scadenza']").expect("deadline selector"),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Map one listing page to notices. Pure over the markup.
    pub fn map_page(&self, html: &str, page_url: &str) -> Vec<Notice> {
        let document = Html::parse_document(html);

        let mut notices = Vec::new();
        for card in document.select(&self.card) {
            let heading = card.select(&self.heading).next();
            let title = heading
                .map(element_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "(senza titolo)".to_string());
            let link = heading
                .and_then(|h| h.select(&self.anchor).next())
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| self.absolute_link(href))
                .unwrap_or_else(|| page_url.to_string());
            let deadline = card
                .select(&self.deadline)
                .next()
                .map(element_text)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| OPEN_DEADLINE.to_string());
            if !self.filter.includes(&deadline) {
                continue;
            }

            notices.push(Notice {
                id: Uuid::new_v4().to_string(),
                tags: self.taxonomy.classify(&title),
                title,
                entity: ENTITY.to_string(),
                deadline,
                amount: UNKNOWN_AMOUNT.to_string(),
                link,
            });
        }
        notices
    }

    fn absolute_link(&self, href: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        Some(base.join(href).ok()?.to_string())
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}?page={}&search={}", self.base_url, page, SEARCH_TERM)
    }
}

/// Element text with whitespace collapsed.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SourceAdapter for AltoAdigeListing {
    fn source_name(&self) -> &str {
        "Portale bandi Alto Adige"
    }

    async fn fetch(&self) -> Result<Vec<Notice>> {
        let pages: Vec<Vec<Notice>> = stream::iter(1..=self.pages)
            .map(|page| {
                let url = self.page_url(page);
                async move {
                    match self.fetcher.get_text(&url).await {
                        Ok(html) => self.map_page(&html, &url),
                        Err(e) => {
                            warn!("{}: page {} failed: {}", self.source_name(), page, e);
                            Vec::new()
                        }
                    }
                }
            })
            .buffered(PAGE_CONCURRENCY)
            .collect()
            .await;

        let notices: Vec<Notice> = pages.into_iter().flatten().collect();
        info!("{}: {} notices", self.source_name(), notices.len());
        Ok(notices)
    }
}
