mod duckduckgo;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

pub use duckduckgo::DuckDuckGoSearch;

use crate::config::models::{SearchProviderType, WebSearchConfig};

pub const NO_RESULTS: &str = "No results found";
pub const SEARCH_NOT_CONFIGURED: &str = "Web search is not configured on this server";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search backend returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

pub fn create_search_provider(
    config: &WebSearchConfig,
) -> Result<Arc<dyn WebSearchProvider>, SearchError> {
    match config.r#type {
        SearchProviderType::DuckDuckGo => Ok(Arc::new(DuckDuckGoSearch::new(
            config.base_url.as_deref(),
        )?)),
    }
}

pub fn format_search_results(results: &[SearchResult], max_results: usize) -> String {
    let blocks: Vec<String> = results
        .iter()
        .take(max_results)
        .map(|r| format!("Title: {}\nURL: {}\nSnippet: {}", r.title, r.url, r.snippet))
        .collect();

    if blocks.is_empty() {
        NO_RESULTS.to_string()
    } else {
        blocks.join("\n\n")
    }
}

/// Runs a search and renders it as plain text for a model or a client.
/// Failures are reported in the returned text.
pub async fn run_search_tool(
    provider: Option<&dyn WebSearchProvider>,
    query: &str,
    max_results: usize,
) -> String {
    let Some(provider) = provider else {
        warn!("Search requested for '{}' but no search provider is configured", query);
        return SEARCH_NOT_CONFIGURED.to_string();
    };

    info!(
        "{} search called with query '{}' (max_results: {})",
        provider.name(),
        query,
        max_results
    );
    match provider.search(query, max_results).await {
        Ok(results) => {
            info!("{} returned {} results for '{}'", provider.name(), results.len(), query);
            format_search_results(&results, max_results)
        }
        Err(e) => {
            warn!("{} search failed for '{}': {}", provider.name(), query, e);
            format!("Search failed: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSearch(Result<Vec<SearchResult>, u16>);

    #[async_trait]
    impl WebSearchProvider for FixedSearch {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(&self, _: &str, _: usize) -> Result<Vec<SearchResult>, SearchError> {
            self.0.clone().map_err(SearchError::Status)
        }
    }

    fn result(n: usize) -> SearchResult {
        SearchResult {
            title: format!("T{n}"),
            url: format!("https://example.com/{n}"),
            snippet: format!("S{n}"),
        }
    }

    #[test]
    fn test_format_blocks_and_limit() {
        let text = format_search_results(&[result(1), result(2), result(3)], 2);
        assert_eq!(
            text,
            "Title: T1\nURL: https://example.com/1\nSnippet: S1\n\n\
             Title: T2\nURL: https://example.com/2\nSnippet: S2"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_search_results(&[], 5), NO_RESULTS);
    }

    #[tokio::test]
    async fn test_tool_without_provider() {
        assert_eq!(run_search_tool(None, "q", 5).await, SEARCH_NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_tool_reports_failure_as_text() {
        let provider = FixedSearch(Err(503));
        let text = run_search_tool(Some(&provider), "q", 5).await;
        assert_eq!(text, "Search failed: search backend returned status 503");
    }

    #[tokio::test]
    async fn test_tool_formats_results() {
        let provider = FixedSearch(Ok(vec![result(1)]));
        let text = run_search_tool(Some(&provider), "q", 5).await;
        assert!(text.starts_with("Title: T1\n"));
    }
}
