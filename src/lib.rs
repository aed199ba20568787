pub mod aggregator;
pub mod deadline;
pub mod fetcher;
pub mod filters;
pub mod normalize;
pub mod sources;
pub mod types;

pub use aggregator::{dedup_by_id, sort_by_deadline, BandiAggregator};
pub use deadline::{parse_deadline, within_window_on, DeadlineFilter};
pub use fetcher::Fetcher;
pub use normalize::{strip_markup, Taxonomy};
pub use sources::{AltoAdigeListing, CkanDatastore, PatFeed, SourceAdapter, TrentoApi};
pub use types::*;
