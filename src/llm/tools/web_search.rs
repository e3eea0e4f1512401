//! 网页搜索工具 - 供Agent在推理过程中调用

use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;

use crate::search::WebSearch;
use crate::types::SearchResult;

/// 一次流水线运行中所有搜索到的结果，按首次出现顺序去重
#[derive(Debug, Clone, Default)]
pub struct CitationCollector {
    inner: Arc<Mutex<Vec<SearchResult>>>,
}

impl CitationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, results: &[SearchResult]) {
        let mut seen = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for result in results {
            if !seen.iter().any(|r| r.url == result.url) {
                seen.push(result.clone());
            }
        }
    }

    pub fn snapshot(&self) -> Vec<SearchResult> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// 网页搜索工具
#[derive(Clone)]
pub struct AgentToolWebSearch {
    search: Arc<dyn WebSearch>,
    max_results: usize,
    collector: CitationCollector,
}

/// 搜索参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// The search query to perform
    pub query: String,
}

/// 搜索结果
#[derive(Debug, Serialize)]
pub struct WebSearchOutput {
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum WebSearchToolError {
    #[error("search query must not be empty")]
    EmptyQuery,
}

impl AgentToolWebSearch {
    pub fn new(
        search: Arc<dyn WebSearch>,
        max_results: usize,
        collector: CitationCollector,
    ) -> Self {
        Self {
            search,
            max_results,
            collector,
        }
    }

    pub fn collector(&self) -> &CitationCollector {
        &self.collector
    }

    /// 执行搜索并记录引用来源
    pub async fn run_search(&self, query: &str) -> Vec<SearchResult> {
        let results = self.search.search(query, self.max_results).await;
        self.collector.record(&results);
        results
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = WebSearchToolError;
    type Args = WebSearchArgs;
    type Output = WebSearchOutput;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Search the web for current information using {}. Returns up to {} results, each with a title, snippet and url.",
                self.search.name(),
                self.max_results
            ),
            parameters: schemars::schema_for!(WebSearchArgs).to_value(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = args.query.trim();
        if query.is_empty() {
            return Err(WebSearchToolError::EmptyQuery);
        }

        info!("   🔧 tool called...web_search@{}", query);

        let results = self.run_search(query).await;
        let message = results
            .is_empty()
            .then(|| "No search results found.".to_string());

        Ok(WebSearchOutput { results, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedSearch(Vec<SearchResult>);

    #[async_trait]
    impl WebSearch for CannedSearch {
        async fn search(&self, _query: &str, max_results: usize) -> Vec<SearchResult> {
            self.0.iter().take(max_results).cloned().collect()
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("A", "a", "https://a.example"),
            SearchResult::new("B", "b", "https://b.example"),
            SearchResult::new("C", "c", "https://c.example"),
        ]
    }

    #[tokio::test]
    async fn test_tool_call_records_citations() {
        let collector = CitationCollector::new();
        let tool = AgentToolWebSearch::new(Arc::new(CannedSearch(results())), 2, collector.clone());

        let output = tool
            .call(WebSearchArgs {
                query: "letters".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.results.len(), 2);
        assert!(output.message.is_none());
        assert_eq!(collector.snapshot(), results()[..2].to_vec());

        // 重复搜索不会产生重复引用
        tool.call(WebSearchArgs {
            query: "letters again".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(collector.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_call_empty_results_message() {
        let tool = AgentToolWebSearch::new(
            Arc::new(CannedSearch(vec![])),
            5,
            CitationCollector::new(),
        );

        let output = tool
            .call(WebSearchArgs {
                query: "nothing".to_string(),
            })
            .await
            .unwrap();

        assert!(output.results.is_empty());
        assert_eq!(output.message.as_deref(), Some("No search results found."));
    }

    #[tokio::test]
    async fn test_definition_describes_query_parameter() {
        let tool = AgentToolWebSearch::new(
            Arc::new(CannedSearch(vec![])),
            5,
            CitationCollector::new(),
        );

        let definition = tool.definition(String::new()).await;
        assert_eq!(definition.name, "web_search");
        assert_eq!(definition.parameters["properties"]["query"]["type"], "string");
        assert_eq!(definition.parameters["required"][0], "query");
    }

    #[tokio::test]
    async fn test_tool_rejects_blank_query() {
        let tool = AgentToolWebSearch::new(
            Arc::new(CannedSearch(results())),
            5,
            CitationCollector::new(),
        );

        let err = tool
            .call(WebSearchArgs {
                query: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WebSearchToolError::EmptyQuery));
    }
}
