//! Markup stripping and keyword-based classification of notice titles.

use regex::Regex;
use std::sync::OnceLock;

/// Label assigned when no taxonomy keyword matches.
pub const FALLBACK_TAG: &str = "varie";

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("markup pattern"))
}

/// Replace every markup tag with a single space and trim the result.
pub fn strip_markup(raw: &str) -> String {
    markup_re().replace_all(raw, " ").trim().to_string()
}

/// Ordered category -> trigger-keyword table used to classify titles.
///
/// The table is immutable after construction; its order determines the
/// order of assigned tags.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    table: Vec<(String, Vec<String>)>,
}

impl Taxonomy {
    pub fn new(table: Vec<(String, Vec<String>)>) -> Self {
        Self { table }
    }

    /// All categories whose keywords appear in the title (case-insensitive
    /// substring match), in table order; [`FALLBACK_TAG`] when none do.
    pub fn classify(&self, title: &str) -> Vec<String> {
        let lower = title.to_lowercase();
        let tags: Vec<String> = self
            .table
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(label, _)| label.clone())
            .collect();

        if tags.is_empty() {
            vec![FALLBACK_TAG.to_string()]
        } else {
            tags
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        let table = [
            ("eventi", &["evento", "manifestazione", "festival", "fiera"][..]),
            ("turismo", &["turismo", "turistica"][..]),
            ("tech", &["tech", "digital", "ict", "hackathon"][..]),
            ("marketing", &["marketing", "promozione", "comunicazione"][..]),
            ("cultura", &["cultur", "museo", "spettacolo"][..]),
        ]
        .into_iter()
        .map(|(label, keywords)| {
            (
                label.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect();

        Self::new(table)
    }
}
