//! 网页搜索适配器 - 关键词搜索并返回有限数量的结果

use async_trait::async_trait;
use thiserror::Error;

use crate::types::SearchResult;

mod duckduckgo;

pub use duckduckgo::{DuckDuckGoSearch, parse_results};

/// 搜索内部错误，不会传播到调用方
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request timed out")]
    Timeout,
    #[error("search request failed: {0}")]
    Request(String),
    #[error("search provider responded with status {0}")]
    Status(u16),
    #[error("failed to parse search results: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else {
            SearchError::Request(e.to_string())
        }
    }
}

/// 网页搜索能力
///
/// 返回按搜索引擎相关性排序的至多`max_results`条结果。
/// 网络失败或超时返回空列表，调用方应当将空列表视为"没有结果"而不是错误。
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult>;

    /// 搜索服务名称，用于日志和状态展示
    fn name(&self) -> &str;
}

// Include tests
#[cfg(test)]
mod tests;
