//! 降级报告 - LLM流水线不可用时，将原始搜索结果整理为简单报告

use crate::types::{Query, Report, ReportSection, SearchResult};

pub const SEARCH_RESULTS_SECTION: &str = "Search Results";
pub const NO_RESULTS_MESSAGE: &str = "No search results were found for this query.";

/// 降级报告生成器，纯格式化，不会失败
pub struct FallbackReporter;

impl FallbackReporter {
    /// 生成只包含"Search Results"一个章节的报告，引用列表与输入完全一致
    pub fn compose(query: &Query, results: Vec<SearchResult>) -> Report {
        let body = if results.is_empty() {
            NO_RESULTS_MESSAGE.to_string()
        } else {
            results
                .iter()
                .enumerate()
                .map(|(i, r)| format_entry(i + 1, r))
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        Report::new(
            format!("Research Report: {}", query),
            vec![ReportSection::new(SEARCH_RESULTS_SECTION, body)],
            results,
        )
    }
}

fn format_entry(index: usize, result: &SearchResult) -> String {
    let mut entry = format!("{}. **[{}]({})**", index, escape_brackets(&result.title), result.url);
    if !result.snippet.trim().is_empty() {
        entry.push_str(&format!("\n   {}", result.snippet.trim()));
    }
    entry
}

fn escape_brackets(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
