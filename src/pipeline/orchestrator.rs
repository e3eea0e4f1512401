use anyhow::Result;
use tracing::info;

use crate::llm::client::LanguageModel;
use crate::llm::tools::web_search::AgentToolWebSearch;
use crate::pipeline::agents::{
    CrewAgent, LLMCallMode, ResearchAnalyst, TechnicalWriter, WebResearcher,
};
use crate::types::Query;

/// 多智能体调研编排器，按顺序执行，每一步以上一步的输出作为上下文
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 执行所有智能体，返回技术写作者产出的Markdown报告
    pub async fn execute_crew(
        &self,
        model: &dyn LanguageModel,
        web_search: &AgentToolWebSearch,
        query: &Query,
        seed_notes: &str,
    ) -> Result<String> {
        info!("🚀 开始执行多智能体调研流程: {}", query);

        let notes = self
            .execute_agent(&WebResearcher, model, web_search, query, Some(seed_notes))
            .await?;
        let analysis = self
            .execute_agent(&ResearchAnalyst, model, web_search, query, Some(&notes))
            .await?;
        let report = self
            .execute_agent(&TechnicalWriter, model, web_search, query, Some(&analysis))
            .await?;

        info!("✓ 多智能体调研流程执行完毕");
        Ok(report)
    }

    /// 执行单个智能体
    async fn execute_agent<T>(
        &self,
        agent: &T,
        model: &dyn LanguageModel,
        web_search: &AgentToolWebSearch,
        query: &Query,
        context: Option<&str>,
    ) -> Result<String>
    where
        T: CrewAgent,
    {
        info!("🤖 执行 {} 智能体...", agent.agent_type());

        let system_prompt = agent.system_prompt();
        let user_prompt = agent.user_prompt(query, context);

        let output = match agent.prompt_template(query).llm_call_mode {
            LLMCallMode::PromptWithTools => {
                model
                    .prompt_with_search(&system_prompt, &user_prompt, web_search)
                    .await?
            }
            LLMCallMode::Prompt => model.prompt(&system_prompt, &user_prompt).await?,
        };

        if output.trim().is_empty() {
            anyhow::bail!("{} returned an empty response", agent.agent_type());
        }

        info!("✓ {} 完成", agent.agent_type());
        Ok(output)
    }
}
