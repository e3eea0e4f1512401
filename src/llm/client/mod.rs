//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Settings;
use crate::llm::tools::web_search::AgentToolWebSearch;

mod providers;
mod react_executor;

use providers::ProviderClient;
use react_executor::ReActExecutor;

/// Agent流水线依赖的语言模型能力
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 单轮对话（不使用工具）
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// 多轮对话，Agent可以调用网页搜索工具
    async fn prompt_with_search(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        web_search: &AgentToolWebSearch,
    ) -> Result<String>;

    /// 模型描述，如`openai/gpt-3.5-turbo`
    fn describe(&self) -> String;
}

/// LLM客户端 - 基于rig的OpenAI/Ollama实现
#[derive(Clone)]
pub struct LLMClient {
    settings: Arc<Settings>,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(settings: Arc<Settings>) -> Result<Self> {
        let client = ProviderClient::new(&settings)?;
        Ok(Self { client, settings })
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let llm_config = &self.settings.llm;
        let max_retries = llm_config.retry_attempts.max(1);
        let retry_delay_ms = llm_config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    warn!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent =
            self.client
                .create_agent(self.settings.model_name(), system_prompt, &self.settings);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    async fn prompt_with_search(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        web_search: &AgentToolWebSearch,
    ) -> Result<String> {
        let agent = self.client.create_agent_with_tools(
            self.settings.model_name(),
            system_prompt,
            &self.settings,
            web_search,
        );
        let max_turns = self.settings.llm.max_tool_turns;
        let verbose = self.settings.verbose;

        if verbose {
            info!("🤖 使用模型 {} 执行带工具的推理", self.describe());
        }

        self.retry_with_backoff(|| async {
            ReActExecutor::execute(&agent, user_prompt, max_turns, verbose).await
        })
        .await
    }

    fn describe(&self) -> String {
        format!(
            "{}/{}",
            self.settings.llm_provider(),
            self.settings.model_name()
        )
    }
}
