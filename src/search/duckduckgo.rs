use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{SearchError, SearchResult, WebSearchProvider};

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// DuckDuckGo Instant Answer API client.
pub struct DuckDuckGoSearch {
    base_url: String,
    http_client: Client,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

// Topics are either leaf entries or named groups of leaf entries.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Entry {
        #[serde(rename = "Text", default)]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
}

impl DuckDuckGoSearch {
    pub fn new(base_url: Option<&str>) -> Result<Self, SearchError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            http_client,
        })
    }
}

fn title_from_text(text: &str) -> String {
    text.split(" - ").next().unwrap_or(text).trim().to_string()
}

fn collect_topics(topics: Vec<RelatedTopic>, out: &mut Vec<SearchResult>) {
    for topic in topics {
        match topic {
            RelatedTopic::Group { topics } => collect_topics(topics, out),
            RelatedTopic::Entry { text, first_url } => {
                if text.is_empty() || first_url.is_empty() {
                    continue;
                }
                out.push(SearchResult {
                    title: title_from_text(&text),
                    url: first_url,
                    snippet: text,
                });
            }
        }
    }
}

fn into_results(answer: InstantAnswer, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();
    if !answer.abstract_text.is_empty() {
        let title = if answer.heading.is_empty() {
            title_from_text(&answer.abstract_text)
        } else {
            answer.heading
        };
        results.push(SearchResult {
            title,
            url: answer.abstract_url,
            snippet: answer.abstract_text,
        });
    }
    collect_topics(answer.related_topics, &mut results);
    results.truncate(max_results);
    results
}

#[async_trait]
impl WebSearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .http_client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let answer: InstantAnswer = response.json().await?;
        debug!(
            "DuckDuckGo answered '{}' with {} related topics",
            query,
            answer.related_topics.len()
        );
        Ok(into_results(answer, max_results))
    }
}
