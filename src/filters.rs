//! Client-side filtering over an already-aggregated collection. These run
//! in the presentation layer and never touch the network.

use crate::types::Notice;

/// Keep notices carrying at least one of the selected tags. An empty
/// selection keeps everything.
pub fn filter_by_tags(notices: &[Notice], selected: &[String]) -> Vec<Notice> {
    if selected.is_empty() {
        return notices.to_vec();
    }
    notices
        .iter()
        .filter(|n| n.tags.iter().any(|t| selected.contains(t)))
        .cloned()
        .collect()
}

/// Case-insensitive substring match on the title. An empty query keeps
/// everything.
pub fn filter_by_query(notices: &[Notice], query: &str) -> Vec<Notice> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return notices.to_vec();
    }
    notices
        .iter()
        .filter(|n| n.title.to_lowercase().contains(&q))
        .cloned()
        .collect()
}
