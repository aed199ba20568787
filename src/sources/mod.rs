pub mod alto_adige;
pub mod ckan;
pub mod pat_feed;
pub mod trento_api;

pub use alto_adige::AltoAdigeListing;
pub use ckan::CkanDatastore;
pub use pat_feed::PatFeed;
pub use trento_api::TrentoApi;

use crate::types::{Notice, Result};
use async_trait::async_trait;
use serde_json::Value;

/// One external bandi source.
///
/// A zero-argument fetch producing canonical notices. Implementations keep
/// network and parsing failures behind this boundary as `Err`; the
/// aggregator turns an `Err` into an empty contribution plus a warning.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable name used in warnings and logs.
    fn source_name(&self) -> &str;

    /// Fetch and map this source's current notices.
    async fn fetch(&self) -> Result<Vec<Notice>>;
}

/// First non-empty value among the given keys. Sources name the same field
/// with different keys, so key order encodes preference.
pub(crate) fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text_value(record.get(*key)))
}

/// Scalar JSON value rendered as non-empty text.
pub(crate) fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
