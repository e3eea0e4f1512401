//! 调研服务 - 优先使用多智能体流水线，失败时降级为搜索结果报告

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::fallback::FallbackReporter;
use crate::pipeline::{PipelineError, PipelineFactory};
use crate::search::WebSearch;
use crate::types::{Query, Report};

/// 健康检查使用的固定探测关键词
pub const HEALTH_PROBE_QUERY: &str = "artificial intelligence";

/// 一次调研的结果，标明报告来自哪条路径
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResearchOutcome {
    /// 多智能体流水线生成的报告
    Pipeline { report: Report },
    /// 流水线不可用时由搜索结果生成的报告
    Fallback { report: Report, reason: String },
}

impl ResearchOutcome {
    pub fn report(&self) -> &Report {
        match self {
            ResearchOutcome::Pipeline { report } => report,
            ResearchOutcome::Fallback { report, .. } => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            ResearchOutcome::Pipeline { report } => report,
            ResearchOutcome::Fallback { report, .. } => report,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResearchOutcome::Fallback { .. })
    }

    /// 界面上展示的模式标签
    pub fn mode_label(&self) -> &'static str {
        match self {
            ResearchOutcome::Pipeline { .. } => "AI agents",
            ResearchOutcome::Fallback { .. } => "Search fallback",
        }
    }
}

/// 调研进行到的阶段，用于驱动界面上的忙碌提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchStage {
    Pipeline,
    Fallback,
}

/// 健康检查结果
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub search_provider: String,
    pub search_working: bool,
    pub probe_results: usize,
    pub llm_provider: String,
    pub model: String,
    pub openai_configured: bool,
}

/// 服务能力描述
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub service: &'static str,
    pub version: &'static str,
    pub operations: Vec<&'static str>,
    pub agents: Vec<&'static str>,
    pub llm_provider: String,
    pub model: String,
    pub max_search_results: usize,
    pub search_timeout_seconds: f64,
    pub pipeline_timeout_seconds: u64,
}

/// 调研服务，负责"流水线或降级"的控制流程
pub struct ResearchService {
    settings: Arc<Settings>,
    search: Arc<dyn WebSearch>,
    factory: Arc<dyn PipelineFactory>,
}

impl ResearchService {
    pub fn new(
        settings: Arc<Settings>,
        search: Arc<dyn WebSearch>,
        factory: Arc<dyn PipelineFactory>,
    ) -> Self {
        Self {
            settings,
            search,
            factory,
        }
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// 执行一次调研，总是返回一份报告
    pub async fn run(&self, query: &Query) -> ResearchOutcome {
        self.run_observed(query, |_| {}).await
    }

    /// 执行一次调研，并在进入流水线或降级阶段时通知观察者
    pub async fn run_observed<F>(&self, query: &Query, observer: F) -> ResearchOutcome
    where
        F: Fn(ResearchStage) + Send + Sync,
    {
        observer(ResearchStage::Pipeline);

        match self.try_pipeline(query).await {
            Ok(report) => {
                info!("✅ 调研完成，共 {} 个章节", report.sections.len());
                ResearchOutcome::Pipeline { report }
            }
            Err(e) => {
                warn!("⚠️ 多智能体流水线不可用，降级为搜索结果报告: {}", e);
                observer(ResearchStage::Fallback);
                let report = self.fallback_report(query).await;
                ResearchOutcome::Fallback {
                    report,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_pipeline(&self, query: &Query) -> Result<Report, PipelineError> {
        let pipeline = self.factory.build(&self.settings).await?;
        pipeline.run(query).await
    }

    async fn fallback_report(&self, query: &Query) -> Report {
        info!("🔍 正在搜索: {}", query);
        let results = self
            .search
            .search(query.as_str(), self.settings.max_search_results)
            .await;
        FallbackReporter::compose(query, results)
    }

    /// 快速搜索，不经过流水线
    pub async fn quick_search(&self, query: &Query) -> Report {
        self.fallback_report(query).await
    }

    /// 用固定关键词探测搜索服务，并报告当前使用的模型
    pub async fn health(&self) -> HealthStatus {
        let probe = self.search.search(HEALTH_PROBE_QUERY, 1).await;
        let search_working = !probe.is_empty();

        HealthStatus {
            status: if search_working { "healthy" } else { "degraded" },
            search_provider: self.search.name().to_string(),
            search_working,
            probe_results: probe.len(),
            llm_provider: self.settings.llm_provider().to_string(),
            model: self.settings.model_name().to_string(),
            openai_configured: self.settings.has_openai_key(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            service: "research-assistant",
            version: env!("CARGO_PKG_VERSION"),
            operations: vec!["research", "quick_search", "health_check", "get_capabilities"],
            agents: vec![
                "Web Research Specialist",
                "Research Analyst",
                "Technical Writer",
            ],
            llm_provider: self.settings.llm_provider().to_string(),
            model: self.settings.model_name().to_string(),
            max_search_results: self.settings.max_search_results,
            search_timeout_seconds: self.settings.search_timeout.as_secs_f64(),
            pipeline_timeout_seconds: self.settings.llm.timeout_seconds,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
