use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{LLMProvider, Settings};
use crate::llm::client::LLMClient;
use crate::pipeline::{CrewPipeline, PipelineError, PipelineFactory, ResearchPipeline};
use crate::search::WebSearch;

/// Ollama `/api/tags` 响应
#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

/// 构造基于rig的多智能体调研流水线
pub struct CrewPipelineFactory {
    search: Arc<dyn WebSearch>,
    http: reqwest::Client,
}

impl CrewPipelineFactory {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self {
            search,
            http: reqwest::Client::new(),
        }
    }

    /// 检查本地Ollama服务是否可达，且配置的模型已经拉取
    pub async fn probe_ollama(&self, settings: &Settings) -> Result<(), PipelineError> {
        let url = format!("{}/api/tags", settings.ollama_host);
        debug!("🔄 正在检查本地模型服务: {}", url);

        let unreachable = |reason: String| {
            PipelineError::Configuration(format!(
                "OPENAI_API_KEY is not set and the local model endpoint {} is unreachable: {}",
                settings.ollama_host, reason
            ))
        };

        let response = self
            .http
            .get(&url)
            .timeout(settings.probe_timeout())
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unreachable(format!("status {}", response.status())));
        }

        // 无法解析模型列表时只要服务可达即可
        let Ok(tags) = response.json::<OllamaTags>().await else {
            return Ok(());
        };

        let wanted = settings.ollama_model.as_str();
        let available = tags
            .models
            .iter()
            .any(|m| m.name == wanted || m.name.strip_suffix(":latest") == Some(wanted));

        if available {
            Ok(())
        } else {
            Err(PipelineError::Configuration(format!(
                "local model '{}' is not available at {}",
                wanted, settings.ollama_host
            )))
        }
    }
}

#[async_trait]
impl PipelineFactory for CrewPipelineFactory {
    async fn build(
        &self,
        settings: &Arc<Settings>,
    ) -> Result<Arc<dyn ResearchPipeline>, PipelineError> {
        if settings.llm_provider() == LLMProvider::Ollama {
            self.probe_ollama(settings).await?;
        }

        let client = LLMClient::new(settings.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        info!(
            "✅ 调研流水线已就绪: {}/{}",
            settings.llm_provider(),
            settings.model_name()
        );

        Ok(Arc::new(CrewPipeline::new(
            settings.clone(),
            Arc::new(client),
            self.search.clone(),
        )))
    }
}
