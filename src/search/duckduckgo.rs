use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{SearchError, WebSearch};
use crate::config::Settings;
use crate::types::SearchResult;

pub const DUCKDUCKGO_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; research-assistant/0.1)";

/// DuckDuckGo HTML搜索
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(settings: &Settings) -> Self {
        Self::with_endpoint(DUCKDUCKGO_HTML_ENDPOINT, settings.search_timeout)
    }

    /// 指定搜索地址（测试时指向本地服务）
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    async fn try_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let url = Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let request = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| SearchError::Timeout)??;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let html = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| SearchError::Timeout)??;

        parse_results(&html, max_results)
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        if max_results == 0 || query.trim().is_empty() {
            return Vec::new();
        }

        debug!("🔍 Searching DuckDuckGo for: {}", query);
        match self.try_search(query, max_results).await {
            Ok(results) => {
                debug!("✅ DuckDuckGo returned {} results", results.len());
                results
            }
            Err(e) => {
                warn!("⚠️ DuckDuckGo search failed, returning no results: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "DuckDuckGo"
    }
}

/// 解析DuckDuckGo HTML结果页，保持页面顺序，去重并截断到`max_results`
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let selector = |s: &str| Selector::parse(s).map_err(|e| SearchError::Parse(e.to_string()));
    let result_sel = selector(".result")?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut results: Vec<SearchResult> = Vec::new();

    for block in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        // 跳过广告
        if block.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(title_elem) = block.select(&title_sel).next() else {
            continue;
        };
        let title = collapse_whitespace(&title_elem.text().collect::<String>());
        let Some(url) = title_elem.value().attr("href").and_then(resolve_link) else {
            continue;
        };
        if title.is_empty() || results.iter().any(|r| r.url == url) {
            continue;
        }

        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|e| collapse_whitespace(&e.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult::new(title, snippet, url));
    }

    Ok(results)
}

/// 还原DuckDuckGo跳转链接（`//duckduckgo.com/l/?uddg=...`）为真实地址
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h.ends_with("duckduckgo.com"))
        && parsed.path().starts_with("/l/");

    let target = if is_redirect {
        let (_, uddg) = parsed.query_pairs().find(|(k, _)| k == "uddg")?;
        Url::parse(&uddg).ok()?
    } else {
        parsed
    };

    match target.scheme() {
        "http" | "https" => Some(target.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod link_tests {
    use super::resolve_link;

    #[test]
    fn test_resolve_redirect_link() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FQuantum_computing&rut=abc";
        assert_eq!(
            resolve_link(href).as_deref(),
            Some("https://en.wikipedia.org/wiki/Quantum_computing")
        );
    }

    #[test]
    fn test_resolve_direct_and_invalid_links() {
        assert_eq!(
            resolve_link("https://example.com/page").as_deref(),
            Some("https://example.com/page")
        );
        assert_eq!(resolve_link("javascript:void(0)"), None);
        assert_eq!(resolve_link("//duckduckgo.com/l/?rut=abc"), None);
    }
}
