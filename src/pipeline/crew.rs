use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::llm::client::LanguageModel;
use crate::llm::tools::web_search::{AgentToolWebSearch, CitationCollector};
use crate::pipeline::orchestrator::ResearchOrchestrator;
use crate::pipeline::{PipelineError, ResearchPipeline};
use crate::search::WebSearch;
use crate::types::{Query, Report, SearchResult};

/// 多智能体调研流水线
pub struct CrewPipeline {
    settings: Arc<Settings>,
    model: Arc<dyn LanguageModel>,
    search: Arc<dyn WebSearch>,
}

impl CrewPipeline {
    pub fn new(
        settings: Arc<Settings>,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            settings,
            model,
            search,
        }
    }

    async fn run_crew(&self, query: &Query) -> Result<Report, PipelineError> {
        let collector = CitationCollector::new();
        let web_search = AgentToolWebSearch::new(
            self.search.clone(),
            self.settings.max_search_results,
            collector.clone(),
        );

        // 先做一次初始搜索，作为网页调研员的起点
        let seed = web_search.run_search(query.as_str()).await;
        let seed_notes = format_seed_notes(&seed);

        let markdown = ResearchOrchestrator
            .execute_crew(self.model.as_ref(), &web_search, query, &seed_notes)
            .await
            .map_err(|e| PipelineError::Execution(e.to_string()))?;

        let report = Report::from_markdown(
            &format!("Research Report: {}", query),
            &markdown,
            collector.snapshot(),
        );

        if report.is_empty() {
            return Err(PipelineError::Execution(
                "the writer agent returned no report content".to_string(),
            ));
        }

        Ok(report)
    }
}

#[async_trait]
impl ResearchPipeline for CrewPipeline {
    async fn run(&self, query: &Query) -> Result<Report, PipelineError> {
        let budget = self.settings.pipeline_timeout();
        info!(
            "🔄 使用 {} 执行调研，时间预算 {}秒",
            self.model.describe(),
            budget.as_secs()
        );

        match tokio::time::timeout(budget, self.run_crew(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("⚠️ 调研流水线超出时间预算 ({}秒)", budget.as_secs());
                Err(PipelineError::Execution(format!(
                    "research pipeline exceeded its time budget of {}s",
                    budget.as_secs()
                )))
            }
        }
    }
}

/// 将初始搜索结果整理为调研员可读的笔记
fn format_seed_notes(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "Initial web search returned no results.".to_string();
    }

    let mut notes = String::from("Initial web search results:\n");
    for (i, r) in results.iter().enumerate() {
        notes.push_str(&format!(
            "{}. {} ({})\n   {}\n",
            i + 1,
            r.title,
            r.url,
            r.snippet
        ));
    }
    notes
}
