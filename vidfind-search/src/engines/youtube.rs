//! YouTube results-page scraper (no API key required).
//!
//! Fetches `/results?search_query=...` filtered to videos, pulls the
//! `ytInitialData` object out of the page's inline scripts, and reshapes
//! each `videoRenderer` into a flat raw record:
//!
//! ```text
//! { id, title, channel: {name, id}, thumbnails: [{url, width, height}],
//!   descriptionSnippet: [{text}], duration, viewCount: {text, short},
//!   publishedTime, link }
//! ```
//!
//! Any of those values may be `null`; normalisation happens downstream.

use scraper::{Html, Selector};
use serde_json::{json, Value};
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::payload::{get_first_of_list, get_map_field, get_path};
use crate::upstream::UpstreamSearch;

/// `sp` filter value restricting results to videos.
const VIDEOS_ONLY_FILTER: &str = "EgIQAQ==";

/// Marker of the inline script holding the initial page state.
const INITIAL_DATA_MARKER: &str = "ytInitialData";

/// Path from `ytInitialData` to the list of result sections.
const SECTIONS_PATH: &[&str] = &[
    "contents",
    "twoColumnSearchResultsRenderer",
    "primaryContents",
    "sectionListRenderer",
    "contents",
];

/// Key-less YouTube search client.
///
/// Holds one HTTP client shared by every call; no per-call state.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    config: SearchConfig,
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config.base_url` is invalid or the
    /// language headers cannot be encoded, and [`SearchError::Http`] if the
    /// HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self { config, client })
    }

    /// The results-page URL for `query`.
    fn results_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.config.base_url)
            .and_then(|base| base.join("/results"))
            .map_err(|e| SearchError::Config(format!("invalid base_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("search_query", query)
            .append_pair("sp", VIDEOS_ONLY_FILTER)
            .append_pair("hl", &self.config.language)
            .append_pair("gl", &self.config.region);
        Ok(url)
    }
}

impl UpstreamSearch for YouTubeClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Value>, SearchError> {
        tracing::trace!(query, limit, "YouTube search");

        let url = self.results_url(query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("YouTube request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("YouTube HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("YouTube response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "YouTube response received");

        parse_results_page(&html, limit, &self.config.base_url)
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}

/// Parse a results page into at most `limit` raw video records.
///
/// Extracted as a separate function for testability with fixture HTML.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] when `ytInitialData` is missing or
/// malformed, or the result sections are not where they should be.
pub(crate) fn parse_results_page(
    html: &str,
    limit: usize,
    base_url: &str,
) -> Result<Vec<Value>, SearchError> {
    let data = extract_initial_data(html)?;

    let sections = get_path(Some(&data), SECTIONS_PATH)
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Upstream("result sections missing from ytInitialData".into()))?;

    let records: Vec<Value> = sections
        .iter()
        .filter_map(|section| get_path(Some(section), &["itemSectionRenderer", "contents"]))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| get_map_field(Some(item), "videoRenderer"))
        .take(limit)
        .map(|renderer| video_record(renderer, base_url))
        .collect();

    tracing::debug!(count = records.len(), "YouTube results parsed");
    Ok(records)
}

/// Locate and decode the `ytInitialData` object in the page's scripts.
fn extract_initial_data(html: &str) -> Result<Value, SearchError> {
    let document = Html::parse_document(html);
    let script_sel = Selector::parse("script")
        .map_err(|e| SearchError::Parse(format!("invalid script selector: {e:?}")))?;

    let script = document
        .select(&script_sel)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains(INITIAL_DATA_MARKER))
        .ok_or_else(|| SearchError::Upstream("ytInitialData not found in results page".into()))?;

    let marker_at = script
        .find(INITIAL_DATA_MARKER)
        .ok_or_else(|| SearchError::Upstream("ytInitialData not found in results page".into()))?;
    let object_at = script[marker_at..]
        .find('{')
        .map(|offset| marker_at + offset)
        .ok_or_else(|| SearchError::Upstream("ytInitialData has no object literal".into()))?;

    // The literal is followed by `;` and possibly more statements, so read
    // exactly one value instead of the whole remainder.
    serde_json::Deserializer::from_str(&script[object_at..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| SearchError::Upstream("ytInitialData is empty".into()))?
        .map_err(|e| SearchError::Upstream(format!("malformed ytInitialData: {e}")))
}

/// Reshape one `videoRenderer` into a flat raw record.
fn video_record(renderer: &Value, base_url: &str) -> Value {
    let renderer = Some(renderer);
    let id = get_map_field(renderer, "videoId").and_then(Value::as_str);

    let owner = get_first_of_list(get_path(renderer, &["ownerText", "runs"]))
        .or_else(|| get_first_of_list(get_path(renderer, &["longBylineText", "runs"])));
    let channel = owner.map(|run| {
        json!({
            "name": get_map_field(Some(run), "text"),
            "id": get_path(Some(run), &["navigationEndpoint", "browseEndpoint", "browseId"]),
        })
    });

    let snippet_runs = get_first_of_list(get_map_field(renderer, "detailedMetadataSnippets"))
        .and_then(|snippet| get_path(Some(snippet), &["snippetText", "runs"]))
        .or_else(|| get_path(renderer, &["descriptionSnippet", "runs"]));

    json!({
        "id": id,
        "title": text_of(get_map_field(renderer, "title")),
        "channel": channel,
        "thumbnails": get_path(renderer, &["thumbnail", "thumbnails"]),
        "descriptionSnippet": snippet_runs,
        "duration": text_of(get_map_field(renderer, "lengthText")),
        "viewCount": {
            "text": text_of(get_map_field(renderer, "viewCountText")),
            "short": text_of(get_map_field(renderer, "shortViewCountText")),
        },
        "publishedTime": text_of(get_map_field(renderer, "publishedTimeText")),
        "link": id.map(|id| format!("{}/watch?v={id}", base_url.trim_end_matches('/'))),
    })
}

/// Flatten a YouTube text node (`simpleText` or `runs[].text`).
fn text_of(node: Option<&Value>) -> Option<String> {
    if let Some(simple) = get_map_field(node, "simpleText").and_then(Value::as_str) {
        return Some(simple.to_owned());
    }
    let runs = get_map_field(node, "runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| get_map_field(Some(run), "text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.youtube.com";

    fn page(initial_data: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head>
<script>var ytcfg = {{"INNERTUBE_API_KEY": "x"}};</script>
<script nonce="abc">var ytInitialData = {initial_data};window.ytcsi = {{}};</script>
</head><body></body></html>"#
        )
    }

    fn sections(items: &str) -> String {
        format!(
            r#"{{"contents":{{"twoColumnSearchResultsRenderer":{{"primaryContents":{{"sectionListRenderer":{{"contents":[{{"itemSectionRenderer":{{"contents":[{items}]}}}},{{"continuationItemRenderer":{{}}}}]}}}}}}}}}}"#
        )
    }

    const FULL_VIDEO: &str = r#"{"videoRenderer":{
        "videoId":"abc123",
        "title":{"runs":[{"text":"Rust "},{"text":"in 100 Seconds"}]},
        "ownerText":{"runs":[{"text":"Fireship","navigationEndpoint":{"browseEndpoint":{"browseId":"UCsBjURrPoezykLs9EqgamOA"}}}]},
        "thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/vi/abc123/hq720.jpg","width":360,"height":202}]},
        "detailedMetadataSnippets":[{"snippetText":{"runs":[{"text":"Rust is a "},{"text":"memory-safe"}]}}],
        "lengthText":{"simpleText":"2:17"},
        "viewCountText":{"simpleText":"2,345,678 views"},
        "shortViewCountText":{"simpleText":"2.3M views"},
        "publishedTimeText":{"simpleText":"3 years ago"}
    }}"#;

    #[test]
    fn parses_full_video_renderer() {
        let html = page(&sections(FULL_VIDEO));
        let records = parse_results_page(&html, 10, BASE).expect("should parse");
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r["id"], "abc123");
        assert_eq!(r["title"], "Rust in 100 Seconds");
        assert_eq!(r["channel"]["name"], "Fireship");
        assert_eq!(r["channel"]["id"], "UCsBjURrPoezykLs9EqgamOA");
        assert_eq!(r["thumbnails"][0]["url"], "https://i.ytimg.com/vi/abc123/hq720.jpg");
        assert_eq!(r["descriptionSnippet"][0]["text"], "Rust is a ");
        assert_eq!(r["descriptionSnippet"][1]["text"], "memory-safe");
        assert_eq!(r["duration"], "2:17");
        assert_eq!(r["viewCount"]["short"], "2.3M views");
        assert_eq!(r["publishedTime"], "3 years ago");
        assert_eq!(r["link"], "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn missing_renderer_fields_become_null() {
        let html = page(&sections(r#"{"videoRenderer":{"videoId":"bare"}}"#));
        let records = parse_results_page(&html, 10, BASE).expect("should parse");
        let r = &records[0];
        assert_eq!(r["id"], "bare");
        assert!(r["title"].is_null());
        assert!(r["channel"].is_null());
        assert!(r["thumbnails"].is_null());
        assert!(r["descriptionSnippet"].is_null());
    }

    #[test]
    fn byline_used_when_owner_missing() {
        let item = r#"{"videoRenderer":{"videoId":"x","longBylineText":{"runs":[{"text":"Acme"}]}}}"#;
        let html = page(&sections(item));
        let records = parse_results_page(&html, 10, BASE).expect("should parse");
        assert_eq!(records[0]["channel"]["name"], "Acme");
        assert!(records[0]["channel"]["id"].is_null());
    }

    #[test]
    fn non_video_items_are_ignored() {
        let items = format!(
            r#"{{"channelRenderer":{{"channelId":"UC1"}}}},{FULL_VIDEO},{{"shelfRenderer":{{}}}},{{"videoRenderer":{{"videoId":"second"}}}}"#
        );
        let html = page(&sections(&items));
        let records = parse_results_page(&html, 10, BASE).expect("should parse");
        let ids: Vec<&str> = records.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, ["abc123", "second"]);
    }

    #[test]
    fn respects_limit() {
        let items: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"videoRenderer":{{"videoId":"v{i}"}}}}"#))
            .collect();
        let html = page(&sections(&items.join(",")));
        let records = parse_results_page(&html, 5, BASE).expect("should parse");
        assert_eq!(records.len(), 5);
        assert_eq!(records[4]["id"], "v4");
    }

    #[test]
    fn empty_section_list_is_success() {
        let html = page(&sections(""));
        let records = parse_results_page(&html, 10, BASE).expect("should parse");
        assert!(records.is_empty());
    }

    #[test]
    fn missing_initial_data_is_upstream_failure() {
        let err = parse_results_page("<html><body>consent</body></html>", 10, BASE).unwrap_err();
        assert!(err.is_upstream_failure());
        assert!(err.to_string().contains("ytInitialData not found"));
    }

    #[test]
    fn malformed_initial_data_is_upstream_failure() {
        let html = page(r#"{"contents": {"twoColumnSearchResultsRenderer": "#);
        let err = parse_results_page(&html, 10, BASE).unwrap_err();
        assert!(err.is_upstream_failure());
    }

    #[test]
    fn unexpected_shape_is_upstream_failure() {
        let html = page(r#"{"contents":{"singleColumnBrowseResultsRenderer":{}}}"#);
        let err = parse_results_page(&html, 10, BASE).unwrap_err();
        assert!(err.is_upstream_failure());
        assert!(err.to_string().contains("result sections missing"));
    }

    #[test]
    fn text_of_variants() {
        assert_eq!(text_of(Some(&json!({"simpleText": "a"}))), Some("a".into()));
        assert_eq!(
            text_of(Some(&json!({"runs": [{"text": "a"}, {"text": "b"}]}))),
            Some("ab".into())
        );
        assert_eq!(text_of(Some(&json!({"runs": []}))), None);
        assert_eq!(text_of(Some(&json!("plain"))), None);
        assert_eq!(text_of(None), None);
    }

    #[test]
    fn results_url_encodes_query() {
        let client = YouTubeClient::new(SearchConfig::default()).expect("client");
        let url = client.results_url("rust & c++ #1").expect("url");
        assert_eq!(url.path(), "/results");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("search_query".into(), "rust & c++ #1".into())));
        assert!(pairs.contains(&("sp".into(), VIDEOS_ONLY_FILTER.into())));
        assert!(pairs.contains(&("hl".into(), "en".into())));
        assert!(pairs.contains(&("gl".into(), "US".into())));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SearchConfig {
            primary_limit: 0,
            ..Default::default()
        };
        assert!(YouTubeClient::new(config).is_err());
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<YouTubeClient>();
    }

    #[tokio::test]
    #[ignore] // Live test: run with `cargo test -- --ignored`
    async fn live_youtube_search() {
        let client = YouTubeClient::new(SearchConfig::default()).expect("client");
        let records = client.search("rust programming", 5).await.expect("live search");
        assert!(!records.is_empty());
        assert!(records.len() <= 5);
        for r in &records {
            assert!(r["id"].is_string());
        }
    }
}
