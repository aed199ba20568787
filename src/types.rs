use serde::{Deserialize, Serialize};

/// Sentinel deadline meaning "open / no known closing date".
pub const OPEN_DEADLINE: &str = "Aperto";

/// Sentinel amount used when a source does not publish one.
pub const UNKNOWN_AMOUNT: &str = "-";

/// A single procurement/grant/call-for-proposals record ("bando").
///
/// Built entirely inside one adapter invocation and never mutated
/// afterwards. `deadline` is either [`OPEN_DEADLINE`] or a date string
/// handled by the day-first parser in [`crate::deadline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub entity: String,
    pub deadline: String,
    pub amount: String,
    pub tags: Vec<String>,
    pub link: String,
}

/// HTTP and pipeline configuration shared by the aggregator and its adapters.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Timeout for a single HTTP request.
    pub timeout_seconds: u64,
    /// Overall limit for one adapter, including all of its page fetches.
    pub source_timeout_seconds: u64,
    /// Deadline inclusion window, in days from today.
    pub window_days: i64,
    /// Pages requested from the HTML listing source.
    pub listing_pages: u32,
    /// Maximum entries taken from the RSS feed source.
    pub feed_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "BandiAggregator/1.0".to_string(),
            timeout_seconds: 20,
            source_timeout_seconds: 45,
            window_days: 30,
            listing_pages: 1,
            feed_limit: 50,
        }
    }
}

/// A non-fatal failure recovered during aggregation, named per source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceWarning {
    pub source: String,
    pub message: String,
}

/// The aggregated collection together with the warnings collected on the way.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub notices: Vec<Notice>,
    pub warnings: Vec<SourceWarning>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("source {name} timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
