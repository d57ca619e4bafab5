//! Google News RSS search backend.
//!
//! Queries `https://news.google.com/rss/search` with a `when:<N>d` window
//! appended to the search terms, and the `hl`/`gl`/`ceid` parameters set from
//! the request's language and country.
//!
//! # Item Mapping
//!
//! | RSS element | Raw field |
//! |-------------|-----------|
//! | `title` | `title` |
//! | `link` | `url` |
//! | `pubDate` | `published date` |
//! | `description` | `description` (HTML reduced to text) |
//! | `source` | `publisher` as `{ title: <text> }` |

use super::{ArticleSource, FetchError, FetchRequest};
use crate::models::{RawArticle, RawPublisher};
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SEARCH_URL: &str = "https://news.google.com/rss/search";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; news_digest/0.1)";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(default)]
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

/// Client for the Google News RSS search feed.
#[derive(Debug, Clone)]
pub struct GoogleNewsSource {
    client: Client,
    base_url: String,
}

impl GoogleNewsSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: SEARCH_URL.to_string(),
        })
    }

    /// Build the search URL for one request.
    pub fn search_url(&self, request: &FetchRequest) -> Result<Url, FetchError> {
        let q = format!("{} when:{}d", request.query, request.window_days);
        let ceid = format!("{}:{}", request.country_code, request.language_code);
        Url::parse_with_params(
            &self.base_url,
            &[
                ("q", q.as_str()),
                ("hl", request.language_code.as_str()),
                ("gl", request.country_code.as_str()),
                ("ceid", ceid.as_str()),
            ],
        )
        .map_err(|e| FetchError::Backend(format!("invalid search url: {e}")))
    }
}

impl ArticleSource for GoogleNewsSource {
    #[instrument(level = "debug", skip_all, fields(query = %request.query, lang = %request.language_code))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawArticle>, FetchError> {
        let url = self.search_url(request)?;
        debug!(%url, "Fetching Google News RSS");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let preview = response.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_chars(&preview, 200), "Google News returned an error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;

        let mut records = parse_feed(&body)?;
        records.truncate(request.max_results as usize);
        info!(count = records.len(), "Parsed Google News items");
        Ok(records)
    }
}

/// Parse an RSS document into raw records, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<RawArticle>, FetchError> {
    let rss: Rss = quick_xml::de::from_str(xml).map_err(|e| FetchError::Parse(e.to_string()))?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .map(|item| RawArticle {
            title: item.title,
            description: item.description.map(|d| html_to_text(&d)),
            url: item.link,
            publisher: item.source.map(|s| RawPublisher::Structured {
                title: s.name,
                name: None,
            }),
            published_date: item.pub_date,
        })
        .collect())
}

/// Reduce an HTML fragment to its visible text with whitespace collapsed.
fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <generator>NFE/5.0</generator>
    <title>"urban development when:2d" - Google News</title>
    <link>https://news.google.com/search?q=urban+development</link>
    <language>en-IN</language>
    <item>
      <title>Metro phase 3 opens to commuters - The Hindu</title>
      <link>https://news.google.com/rss/articles/abc</link>
      <guid isPermaLink="false">abc</guid>
      <pubDate>Tue, 06 May 2025 04:30:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/abc"&gt;Metro phase 3 opens&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;The Hindu&lt;/font&gt;</description>
      <source url="https://www.thehindu.com">The Hindu</source>
    </item>
    <item>
      <title>Housing scheme stalls</title>
      <link>https://news.google.com/rss/articles/def</link>
      <pubDate>Mon, 05 May 2025 11:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"##;

    fn request() -> FetchRequest {
        FetchRequest {
            query: "urban development".into(),
            language_code: "hi".into(),
            country_code: "IN".into(),
            window_days: 7,
            max_results: 10,
        }
    }

    #[test]
    fn test_parse_feed_items() {
        let records = parse_feed(SAMPLE_RSS).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title.as_deref(), Some("Metro phase 3 opens to commuters - The Hindu"));
        assert_eq!(first.url.as_deref(), Some("https://news.google.com/rss/articles/abc"));
        assert_eq!(first.published_date.as_deref(), Some("Tue, 06 May 2025 04:30:00 GMT"));
        assert_eq!(
            first.publisher.as_ref().map(RawPublisher::display_name).as_deref(),
            Some("The Hindu")
        );
        let description = first.description.as_deref().unwrap();
        assert!(description.starts_with("Metro phase 3 opens"));
        assert!(description.ends_with("The Hindu"));
        assert!(!description.contains('<'));

        let second = &records[1];
        assert!(second.publisher.is_none());
        assert!(second.description.is_none());
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title></channel></rss>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(parse_feed("not xml at all"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_search_url() {
        let source = GoogleNewsSource::new().unwrap();
        let url = source.search_url(&request()).unwrap();
        assert_eq!(url.host_str(), Some("news.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "urban development when:7d".into())));
        assert!(pairs.contains(&("hl".into(), "hi".into())));
        assert!(pairs.contains(&("gl".into(), "IN".into())));
        assert!(pairs.contains(&("ceid".into(), "IN:hi".into())));
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(html_to_text("<b>Hello</b>\n\n   <i>world</i>"), "Hello world");
        assert_eq!(html_to_text("plain"), "plain");
    }
}
