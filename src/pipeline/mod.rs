//! Agent流水线 - 多智能体调研：网页调研员 -> 调研分析师 -> 技术写作者
//!
//! 对外只暴露`ResearchPipeline::run`能力，以及根据配置构造流水线的`PipelineFactory`。

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Settings;
use crate::types::{Query, Report};

pub mod agents;
pub mod crew;
pub mod factory;
pub mod orchestrator;

pub use crew::CrewPipeline;
pub use factory::CrewPipelineFactory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// 流水线无法构造：没有API KEY且本地模型不可达
    #[error("configuration error: {0}")]
    Configuration(String),
    /// 流水线已构造但运行失败：模型服务错误、输出无效或超时
    #[error("execution error: {0}")]
    Execution(String),
}

/// 调研流水线能力
#[async_trait]
pub trait ResearchPipeline: Send + Sync {
    async fn run(&self, query: &Query) -> Result<Report, PipelineError>;
}

/// 根据配置构造调研流水线
#[async_trait]
pub trait PipelineFactory: Send + Sync {
    async fn build(&self, settings: &Arc<Settings>)
    -> Result<Arc<dyn ResearchPipeline>, PipelineError>;
}
