use bandi_aggregator::{
    AltoAdigeListing, CkanDatastore, DeadlineFilter, FetchConfig, Fetcher, PatFeed, Taxonomy,
    TrentoApi,
};
use chrono::{Duration, Utc};
use serde_json::json;

fn fetcher() -> Fetcher {
    Fetcher::new(&FetchConfig::default())
}

fn filter() -> DeadlineFilter {
    DeadlineFilter::new(30)
}

/// A deadline 10 days out, formatted the way the sources publish it.
fn soon() -> String {
    (Utc::now() + Duration::days(10)).format("%d/%m/%Y").to_string()
}

/// A deadline past the 30-day window.
fn far() -> String {
    (Utc::now() + Duration::days(40)).format("%d/%m/%Y").to_string()
}

#[test]
fn trento_maps_items_and_applies_fallbacks() {
    let api = TrentoApi::new(fetcher(), Taxonomy::default(), filter());
    let body = json!({
        "items": [
            {
                "uid": "trento-1",
                "title": "Bando <em>Hackathon</em> comunale",
                "url": "https://example.org/bandi/1",
                "properties": {"dataScadenza": soon(), "importoBase": "100000"}
            },
            {
                "uid": "trento-2",
                "title": "Bando fuori finestra",
                "properties": {"dataScadenza": far()}
            },
            {
                "title": "Bando senza uid",
                "id": 4242,
                "properties": {}
            }
        ]
    });

    let notices = api.map_items(&body);
    assert_eq!(notices.len(), 2, "out-of-window item must be dropped");

    let first = &notices[0];
    assert_eq!(first.id, "trento-1");
    assert!(first.title.contains("Hackathon"));
    assert!(!first.title.contains('<'), "markup must be stripped");
    assert_eq!(first.entity, "Comune di Trento");
    assert_eq!(first.deadline, soon());
    assert_eq!(first.amount, "100000");
    assert_eq!(first.link, "https://example.org/bandi/1");
    assert_eq!(first.tags, vec!["tech"]);

    let fallback = &notices[1];
    assert!(!fallback.id.is_empty(), "missing uid gets a generated id");
    assert_eq!(fallback.deadline, "Aperto");
    assert_eq!(fallback.amount, "-");
    assert_eq!(fallback.link, "4242", "link falls back to the item id");
    assert_eq!(fallback.tags, vec!["varie"]);
}

#[test]
fn trento_tolerates_missing_items_array() {
    let api = TrentoApi::new(fetcher(), Taxonomy::default(), filter());
    assert!(api.map_items(&json!({})).is_empty());
    assert!(api.map_items(&json!({"items": "not-a-list"})).is_empty());
}

#[test]
fn ckan_maps_records_with_field_synonyms() {
    let datastore = CkanDatastore::new(fetcher(), Taxonomy::default(), filter());
    let body = json!({
        "result": {
            "records": [
                {
                    "idGara": "g-1",
                    "oggetto": "Fornitura servizi turismo",
                    "scadenza": soon(),
                    "stazioneAppaltante": "Comune di Rovereto",
                    "importoBaseAsta": "50000",
                    "urlBando": "https://example.org/g1",
                    "urlGara": "https://example.org/g1-alt"
                },
                {
                    "oggetto": "Lavori stradali",
                    "scadenza": "",
                    "urlGara": "https://example.org/g2"
                }
            ]
        }
    });

    let notices = datastore.map_records(&body);
    assert_eq!(notices.len(), 2);

    let first = &notices[0];
    assert_eq!(first.id, "g-1");
    assert_eq!(first.entity, "Comune di Rovereto");
    assert_eq!(first.amount, "50000");
    assert_eq!(first.link, "https://example.org/g1", "urlBando wins over urlGara");
    assert_eq!(first.tags, vec!["turismo"]);

    let second = &notices[1];
    assert!(!second.id.is_empty());
    assert_eq!(second.entity, "PAT");
    assert_eq!(second.deadline, "Aperto");
    assert_eq!(second.amount, "-");
    assert_eq!(second.link, "https://example.org/g2", "urlGara used when urlBando is absent");
}

#[test]
fn ckan_tolerates_malformed_body() {
    let datastore = CkanDatastore::new(fetcher(), Taxonomy::default(), filter());
    assert!(datastore.map_records(&json!({})).is_empty());
    assert!(datastore.map_records(&json!({"result": {}})).is_empty());
}

#[test]
fn alto_adige_maps_cards_with_fallbacks() {
    let listing = AltoAdigeListing::new(fetcher(), Taxonomy::default(), filter());
    let page_url = "https://www.bandi-altoadige.it/?page=1&search=eventi";
    let html = format!(
        r#"<html><body>
        <div class="bando-card">
          <h2><a href="/bando/festival-musica">Festival musica in piazza</a></h2>
          <span data-field="scadenza">{}</span>
        </div>
        <div class="bando-card">
          <p>card malformata, senza intestazione</p>
        </div>
        <div class="bando-card">
          <h2>Bando lontano</h2>
          <span data-field="scadenza">{}</span>
        </div>
        </body></html>"#,
        soon(),
        far()
    );

    let notices = listing.map_page(&html, page_url);
    assert_eq!(notices.len(), 2, "out-of-window card must be dropped");

    let first = &notices[0];
    assert_eq!(first.title, "Festival musica in piazza");
    assert_eq!(first.link, "https://www.bandi-altoadige.it/bando/festival-musica");
    assert_eq!(first.deadline, soon());
    assert_eq!(first.entity, "Provincia Autonoma di Bolzano / Altri");
    assert_eq!(first.tags, vec!["eventi"]);
    assert!(!first.id.is_empty());

    let second = &notices[1];
    assert_eq!(second.title, "(senza titolo)");
    assert_eq!(second.link, page_url, "link falls back to the listing page");
    assert_eq!(second.deadline, "Aperto");

    assert_ne!(notices[0].id, notices[1].id);
}

#[test]
fn alto_adige_empty_page_yields_no_cards() {
    let listing = AltoAdigeListing::new(fetcher(), Taxonomy::default(), filter());
    assert!(listing.map_page("<html><body></body></html>", "x").is_empty());
}

#[test]
fn pat_feed_recovers_deadline_from_title() {
    let feed = PatFeed::new(fetcher(), Taxonomy::default(), filter());
    assert_eq!(
        feed.deadline_from_title("Gara lavori - scadenza: 31/12/2025"),
        Some("31/12/2025".to_string())
    );
    assert_eq!(
        feed.deadline_from_title("SCADENZA 31/12/2025"),
        Some("31/12/2025".to_string())
    );
    assert_eq!(feed.deadline_from_title("Bando senza data"), None);
}

#[test]
fn pat_feed_maps_entries_up_to_limit() {
    let feed = PatFeed::new(fetcher(), Taxonomy::default(), filter()).with_limit(2);
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel>
          <title>Bandi di gara</title>
          <item>
            <title>Gara lavori scadenza: {}</title>
            <link>https://example.org/pat/1</link>
          </item>
          <item>
            <title>Bando Turismo</title>
            <link>https://example.org/pat/2</link>
          </item>
          <item>
            <title>Terzo bando oltre il limite</title>
            <link>https://example.org/pat/3</link>
          </item>
        </channel></rss>"#,
        soon()
    );

    let notices = feed.map_content(&xml).unwrap();
    assert_eq!(notices.len(), 2, "only the first `limit` entries are taken");

    let first = &notices[0];
    assert_eq!(first.deadline, soon());
    assert_eq!(first.id, "https://example.org/pat/1");
    assert_eq!(first.link, "https://example.org/pat/1");
    assert_eq!(first.entity, "Provincia Autonoma di Trento (PAT)");

    let second = &notices[1];
    assert_eq!(second.deadline, "Aperto");
    assert_eq!(second.tags, vec!["turismo"]);
}

#[test]
fn pat_feed_rejects_non_feed_content() {
    let feed = PatFeed::new(fetcher(), Taxonomy::default(), filter());
    assert!(feed.map_content("questo non e' un feed").is_err());
}
