use crate::deadline::{parse_deadline, DeadlineFilter};
use crate::fetcher::Fetcher;
use crate::normalize::Taxonomy;
use crate::sources::{AltoAdigeListing, CkanDatastore, PatFeed, SourceAdapter, TrentoApi};
use crate::types::{AggregatorError, FetchConfig, LoadReport, Notice, SourceWarning};
use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fans the source adapters out, joins their results and produces one
/// deduplicated, deadline-ordered collection.
///
/// Adapter order is fixed and significant: it decides which record survives
/// deduplication.
pub struct BandiAggregator {
    sources: Vec<Box<dyn SourceAdapter>>,
    source_timeout: Duration,
}

impl BandiAggregator {
    /// Aggregator over the four production sources.
    pub fn new(config: FetchConfig) -> Self {
        let fetcher = Fetcher::new(&config);
        let taxonomy = Taxonomy::default();
        let filter = DeadlineFilter::new(config.window_days);

        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(TrentoApi::new(fetcher.clone(), taxonomy.clone(), filter)),
            Box::new(CkanDatastore::new(fetcher.clone(), taxonomy.clone(), filter)),
            Box::new(
                AltoAdigeListing::new(fetcher.clone(), taxonomy.clone(), filter)
                    .with_pages(config.listing_pages),
            ),
            Box::new(PatFeed::new(fetcher, taxonomy, filter).with_limit(config.feed_limit)),
        ];

        Self {
            sources,
            source_timeout: Duration::from_secs(config.source_timeout_seconds),
        }
    }

    /// Aggregator over caller-supplied adapters.
    pub fn from_sources(sources: Vec<Box<dyn SourceAdapter>>, source_timeout: Duration) -> Self {
        Self {
            sources,
            source_timeout,
        }
    }

    /// Fetch every source and return the merged, ordered collection.
    ///
    /// Never fails: partial-source failures are logged and the remaining
    /// sources' results are returned, down to an empty collection when no
    /// source succeeds.
    pub async fn load_bandi(&self) -> Vec<Notice> {
        self.load_bandi_with_report().await.notices
    }

    /// Same as [`Self::load_bandi`], additionally returning the warnings
    /// naming each failing source.
    pub async fn load_bandi_with_report(&self) -> LoadReport {
        let fetches = self.sources.iter().map(|source| async move {
            let outcome = timeout(self.source_timeout, source.fetch()).await;
            (source.source_name().to_string(), outcome)
        });

        let mut notices = Vec::new();
        let mut warnings = Vec::new();
        for (name, outcome) in join_all(fetches).await {
            match outcome {
                Ok(Ok(batch)) => {
                    debug!("{}: contributed {} notices", name, batch.len());
                    notices.extend(batch);
                }
                Ok(Err(e)) => {
                    warn!("{} failed: {}", name, e);
                    warnings.push(SourceWarning {
                        source: name,
                        message: e.to_string(),
                    });
                }
                Err(_) => {
                    let e = AggregatorError::Timeout {
                        name: name.clone(),
                        seconds: self.source_timeout.as_secs(),
                    };
                    warn!("{}", e);
                    warnings.push(SourceWarning {
                        source: name,
                        message: e.to_string(),
                    });
                }
            }
        }

        let notices = sort_by_deadline(dedup_by_id(notices));
        LoadReport { notices, warnings }
    }
}

/// Keep the first record seen for every id; input order decides survivors.
pub fn dedup_by_id(notices: Vec<Notice>) -> Vec<Notice> {
    let mut seen = HashSet::new();
    notices
        .into_iter()
        .filter(|n| seen.insert(n.id.clone()))
        .collect()
}

/// Stable ascending sort by parsed deadline. Open and unreadable deadlines
/// map to the max-date sentinel so they sort last, keeping their relative
/// order.
pub fn sort_by_deadline(mut notices: Vec<Notice>) -> Vec<Notice> {
    notices.sort_by_key(|n| sort_key(&n.deadline));
    notices
}

fn sort_key(deadline: &str) -> NaiveDate {
    parse_deadline(deadline).unwrap_or(NaiveDate::MAX)
}
