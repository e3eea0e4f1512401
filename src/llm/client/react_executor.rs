//! ReAct执行器 - 负责执行带工具的多轮对话逻辑

use anyhow::Result;
use rig::completion::{AssistantContent, Message, PromptError};
use tracing::{info, warn};

use super::providers::ProviderAgent;

/// ReAct执行器
pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行ReAct循环逻辑，达到最大轮次时返回已获得的部分结果
    pub async fn execute(
        agent: &ProviderAgent,
        user_prompt: &str,
        max_iterations: usize,
        verbose: bool,
    ) -> Result<String> {
        if verbose {
            info!("   ♻️ 激活ReAct Agent模式，最大迭代次数: {}", max_iterations);
        }

        match agent.multi_turn(user_prompt, max_iterations).await {
            Ok(response) => {
                if verbose {
                    info!("   ✅ ReAct Agent任务完成");
                }
                Ok(response)
            }
            Err(PromptError::MaxDepthError {
                max_depth,
                chat_history,
                prompt: _,
            }) => {
                warn!("   ⚠️ 达到最大迭代次数 ({}), 触发中断", max_depth);

                let (content, tool_calls) = Self::extract_partial_result(&chat_history);
                if verbose {
                    info!("   🔧 已执行的工具调用: {:?}", tool_calls);
                }

                match content {
                    Some(content) => Ok(content),
                    None => Err(anyhow::anyhow!(
                        "ReAct Agent因达到最大迭代次数({})而未完成任务",
                        max_depth
                    )),
                }
            }
            Err(e) => Err(anyhow::anyhow!("ReAct Agent任务执行失败: {}", e)),
        }
    }

    /// 从聊天历史中提取最后的助手文本以及工具调用记录
    fn extract_partial_result(chat_history: &[Message]) -> (Option<String>, Vec<String>) {
        let last_assistant_message = chat_history.iter().rev().find_map(|msg| {
            if let Message::Assistant { content, .. } = msg {
                let text_content = content
                    .iter()
                    .filter_map(|c| {
                        if let AssistantContent::Text(text) = c {
                            Some(text.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                (!text_content.trim().is_empty()).then_some(text_content)
            } else {
                None
            }
        });

        let mut tool_calls = Vec::new();
        for msg in chat_history {
            if let Message::Assistant { content, .. } = msg {
                for c in content.iter() {
                    if let AssistantContent::ToolCall(tool_call) = c {
                        tool_calls.push(format!(
                            "{}({})",
                            tool_call.function.name, tool_call.function.arguments
                        ));
                    }
                }
            }
        }

        (last_assistant_message, tool_calls)
    }
}
