use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;
use wreq::header::{ACCEPT_LANGUAGE, REFERER};
use wreq_util::Emulation;

use crate::{
    error::{SyncError, SyncResult},
    models::ExternalNomination,
};

const NEXT_DATA_MARKER: &str = "id=\"__NEXT_DATA__\"";
const SCRIPT_CLOSE: &str = "</script>";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,ja;q=0.8";
const EVENT_REFERER: &str = "https://www.imdb.com/";

/// Source of raw event page HTML.
#[async_trait]
pub trait EventPageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> SyncResult<String>;
}

pub struct HttpEventFetcher {
    client: wreq::Client,
}

impl HttpEventFetcher {
    pub fn new(timeout: Duration) -> Result<Self, wreq::Error> {
        let client = wreq::Client::builder()
            .emulation(Emulation::Chrome131)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EventPageFetcher for HttpEventFetcher {
    async fn fetch(&self, url: &str) -> SyncResult<String> {
        debug!(url = %url, "fetching event page");
        let fetch_err =
            |reason: String| SyncError::ExternalFetch { url: url.to_string(), reason };

        let resp = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
            .header(REFERER, EVENT_REFERER)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        resp.text().await.map_err(|e| fetch_err(e.to_string()))
    }
}

/// Trims the configured URL and makes sure it ends with a slash.
pub fn normalize_event_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') { url.to_string() } else { format!("{url}/") }
}

/// Returns the text of the `__NEXT_DATA__` script element.
pub fn embedded_payload(html: &str) -> SyncResult<&str> {
    let start = html
        .find(NEXT_DATA_MARKER)
        .ok_or_else(|| SyncError::ExternalFormat("__NEXT_DATA__ script not found".into()))?;
    let rest = &html[start + NEXT_DATA_MARKER.len()..];

    let unterminated =
        || SyncError::ExternalFormat("__NEXT_DATA__ script is not terminated".into());
    let body_start = rest.find('>').ok_or_else(unterminated)?;
    let body = &rest[body_start + 1..];
    let body_end = body.find(SCRIPT_CLOSE).ok_or_else(unterminated)?;

    Ok(body[..body_end].trim())
}

/// One category block of the event page, flattened out of its award.
#[derive(Clone, Debug, Default)]
pub struct CategorySection {
    pub award_label: Option<String>,
    pub category_label: Option<String>,
    pub entries: Vec<NominationEntry>,
}

impl CategorySection {
    /// The category label, or the award label when the category has none.
    pub fn match_label(&self) -> Option<&str> {
        non_blank(self.category_label.as_deref()).or_else(|| non_blank(self.award_label.as_deref()))
    }
}

/// A nomination as parsed from the page, prior to field extraction.
#[derive(Clone, Debug, Default)]
pub struct NominationEntry {
    pub works: Vec<WorkRef>,
    pub is_winner: Option<bool>,
    pub note: Option<Value>,
}

#[derive(Clone, Debug, Default)]
pub struct WorkRef {
    pub id: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
}

/// Parses the embedded JSON into category sections in document order.
pub fn parse_sections(payload: &str) -> SyncResult<Vec<CategorySection>> {
    let data: NextData = serde_json::from_str(payload)
        .map_err(|e| SyncError::ExternalFormat(format!("invalid __NEXT_DATA__ JSON: {e}")))?;

    let awards = data.props.and_then(|p| p.page_props).and_then(|p| p.edition).map(|e| e.awards);

    let mut sections = Vec::new();
    for award in awards.unwrap_or_default() {
        let edges = award.nomination_categories.map(|c| c.edges).unwrap_or_default();
        for node in edges.into_iter().filter_map(|edge| edge.node) {
            let entries = node
                .nominations
                .map(|n| n.edges)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|edge| edge.node)
                .map(NominationEntry::from)
                .collect();

            sections.push(CategorySection {
                award_label: award.text.clone(),
                category_label: node.category.and_then(|c| c.text),
                entries,
            });
        }
    }

    debug!(sections = sections.len(), "parsed event page sections");
    Ok(sections)
}

/// Extracts nominations from a section, keeping page order.
pub fn extract_nominations(section: &CategorySection) -> Vec<ExternalNomination> {
    section
        .entries
        .iter()
        .map(|entry| {
            let work = entry.works.first();
            let imdb_id = work.and_then(|w| non_blank(w.id.as_deref())).map(str::to_string);
            let original_title = work.and_then(|w| w.original_title.clone());
            let title = work.and_then(|w| w.title.clone()).or_else(|| original_title.clone());

            ExternalNomination {
                imdb_id,
                title,
                original_title,
                is_winner: entry.is_winner.unwrap_or(false),
                note: note_text(entry.note.as_ref()),
            }
        })
        .collect()
}

/// A note is a plain string, or an object with `plainText` either at the top
/// or under `value`. Anything else is ignored.
fn note_text(raw: Option<&Value>) -> Option<String> {
    let text = match raw? {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("plainText").and_then(Value::as_str).or_else(|| {
            map.get("value").and_then(|v| v.get("plainText")).and_then(Value::as_str)
        }),
        _ => None,
    };
    non_blank(text).map(str::to_string)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NextData {
    props: Option<Props>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Props {
    #[serde(rename = "pageProps")]
    page_props: Option<PageProps>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageProps {
    edition: Option<Edition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Edition {
    #[serde(deserialize_with = "null_as_default")]
    awards: Vec<Award>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Award {
    text: Option<String>,
    #[serde(rename = "nominationCategories")]
    nomination_categories: Option<CategoryConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryConnection {
    #[serde(deserialize_with = "null_as_default")]
    edges: Vec<CategoryEdge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryEdge {
    node: Option<CategoryNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryNode {
    category: Option<TextHolder>,
    nominations: Option<NominationConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextHolder {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominationConnection {
    #[serde(deserialize_with = "null_as_default")]
    edges: Vec<NominationEdge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominationEdge {
    node: Option<NominationNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominationNode {
    #[serde(rename = "isWinner")]
    is_winner: Option<bool>,
    notes: Option<Value>,
    #[serde(rename = "awardedEntities")]
    awarded_entities: Option<AwardedEntities>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AwardedEntities {
    #[serde(rename = "awardTitles", deserialize_with = "null_as_default")]
    award_titles: Vec<AwardTitle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AwardTitle {
    title: Option<TitleNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleNode {
    id: Option<String>,
    #[serde(rename = "titleText")]
    title_text: Option<TextHolder>,
    #[serde(rename = "originalTitleText")]
    original_title_text: Option<TextHolder>,
}

impl From<NominationNode> for NominationEntry {
    fn from(node: NominationNode) -> Self {
        let works = node
            .awarded_entities
            .map(|e| e.award_titles)
            .unwrap_or_default()
            .into_iter()
            .map(|t| {
                t.title
                    .map(|t| WorkRef {
                        id: t.id,
                        title: t.title_text.and_then(|x| x.text),
                        original_title: t.original_title_text.and_then(|x| x.text),
                    })
                    .unwrap_or_default()
            })
            .collect();

        Self { works, is_winner: node.is_winner, note: node.notes }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page(payload: &Value) -> String {
        format!(
            "<html><head><script id=\"__NEXT_DATA__\" type=\"application/json\">{payload}</script></head></html>"
        )
    }

    fn nomination(id: &str, title: &str, winner: Value, notes: Value) -> Value {
        json!({ "node": {
            "isWinner": winner,
            "notes": notes,
            "awardedEntities": { "awardTitles": [
                { "title": { "id": id, "titleText": { "text": title }, "originalTitleText": { "text": format!("{title} (original)") } } }
            ] }
        } })
    }

    #[test]
    fn normalizes_event_url() {
        assert_eq!(normalize_event_url(" https://x.test/ev0000003/2024/1 "), "https://x.test/ev0000003/2024/1/");
        assert_eq!(normalize_event_url("https://x.test/a/"), "https://x.test/a/");
    }

    #[test]
    fn finds_embedded_payload() {
        let html = page(&json!({ "a": 1 }));
        assert_eq!(embedded_payload(&html).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn missing_marker_is_format_error() {
        let err = embedded_payload("<html><script>{}</script></html>").unwrap_err();
        assert!(matches!(err, SyncError::ExternalFormat(msg) if msg.contains("not found")));
    }

    #[test]
    fn unterminated_script_is_format_error() {
        let err = embedded_payload("<script id=\"__NEXT_DATA__\">{\"a\":1}").unwrap_err();
        assert!(matches!(err, SyncError::ExternalFormat(msg) if msg.contains("not terminated")));
    }

    #[test]
    fn invalid_json_is_format_error() {
        let err = parse_sections("{not json").unwrap_err();
        assert!(matches!(err, SyncError::ExternalFormat(msg) if msg.contains("invalid")));
    }

    #[test]
    fn missing_edition_yields_no_sections() {
        assert!(parse_sections("{}").unwrap().is_empty());
        assert!(parse_sections(r#"{"props":{"pageProps":{"edition":{"awards":null}}}}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn flattens_sections_in_document_order() {
        let payload = json!({ "props": { "pageProps": { "edition": { "awards": [
            { "text": "Oscar", "nominationCategories": { "edges": [
                { "node": { "category": { "text": "Best Film Editing" }, "nominations": { "edges": [] } } },
                { "node": { "category": { "text": "Best Picture" }, "nominations": { "edges": [] } } }
            ] } },
            { "text": "Honorary Award", "nominationCategories": { "edges": [
                { "node": { "category": null, "nominations": null } }
            ] } }
        ] } } } });

        let sections = parse_sections(&payload.to_string()).unwrap();
        let labels: Vec<_> = sections.iter().map(|s| s.match_label()).collect();
        assert_eq!(labels, vec![Some("Best Film Editing"), Some("Best Picture"), Some("Honorary Award")]);
    }

    #[test]
    fn extracts_nominations_with_fallbacks() {
        let payload = json!({ "props": { "pageProps": { "edition": { "awards": [
            { "text": "Oscar", "nominationCategories": { "edges": [
                { "node": { "category": { "text": "Best Picture" }, "nominations": { "edges": [
                    nomination(" tt0000001 ", "Alpha", json!(true), json!("  Producers  ")),
                    nomination("tt0000002", "Beta", Value::Null, json!({ "plainText": "direct" })),
                    nomination("tt0000003", "Gamma", json!(false), json!({ "value": { "plainText": " nested " } })),
                    nomination("  ", "Delta", json!(false), json!({ "value": { "other": 1 } })),
                    nomination("tt0000005", "Epsilon", json!(false), json!(42)),
                    { "node": { "isWinner": true, "awardedEntities": { "awardTitles": [
                        { "title": { "id": "tt0000006", "originalTitleText": { "text": "Zeta" } } }
                    ] } } },
                    { "node": { "awardedEntities": null } }
                ] } } }
            ] } }
        ] } } } });

        let sections = parse_sections(&payload.to_string()).unwrap();
        let records = extract_nominations(&sections[0]);
        assert_eq!(records.len(), 7);

        assert_eq!(records[0].imdb_id.as_deref(), Some("tt0000001"));
        assert_eq!(records[0].title.as_deref(), Some("Alpha"));
        assert!(records[0].is_winner);
        assert_eq!(records[0].note.as_deref(), Some("Producers"));

        assert!(!records[1].is_winner);
        assert_eq!(records[1].note.as_deref(), Some("direct"));
        assert_eq!(records[2].note.as_deref(), Some("nested"));

        assert_eq!(records[3].imdb_id, None);
        assert_eq!(records[3].note, None);
        assert_eq!(records[4].note, None);

        assert_eq!(records[5].title.as_deref(), Some("Zeta"));
        assert!(records[5].is_winner);

        assert_eq!(records[6], ExternalNomination::default());
    }

    #[test]
    fn only_the_first_listed_work_supplies_the_id() {
        let payload = json!({ "props": { "pageProps": { "edition": { "awards": [
            { "text": "Oscar", "nominationCategories": { "edges": [
                { "node": { "category": { "text": "Best Picture" }, "nominations": { "edges": [
                    { "node": { "isWinner": true, "awardedEntities": { "awardTitles": [
                        { "title": null },
                        { "title": { "id": "tt9999999", "titleText": { "text": "Second" } } }
                    ] } } }
                ] } } }
            ] } }
        ] } } } });

        let sections = parse_sections(&payload.to_string()).unwrap();
        let records = extract_nominations(&sections[0]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].imdb_id, None);
        assert_eq!(records[0].title, None);
        assert!(records[0].is_winner);
    }

    #[test]
    fn blank_string_note_is_absent() {
        assert_eq!(note_text(Some(&json!("   "))), None);
        assert_eq!(note_text(Some(&json!({ "plainText": "" }))), None);
        assert_eq!(note_text(None), None);
    }
}
