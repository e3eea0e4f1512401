//! 页面会话状态：对话历史与提交状态机，只保存在内存中

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::research::ResearchOutcome;
use crate::types::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// 对话历史中的一条消息
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub timestamp: DateTime<Local>,
    /// 用户的问题原文，或助手回复的Markdown
    pub content: String,
    /// 报告来源的模式标签，只有助手的报告消息才有
    pub mode: Option<&'static str>,
    pub citations: Vec<SearchResult>,
    pub is_error: bool,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            timestamp: Local::now(),
            content: content.into(),
            mode: None,
            citations: Vec::new(),
            is_error: false,
        }
    }

    pub fn question(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn report(outcome: &ResearchOutcome) -> Self {
        let report = outcome.report();
        // 引用单独展示
        let mut message = Self::new(Role::Assistant, report.to_markdown(false));
        message.mode = Some(outcome.mode_label());
        message.citations = report.citations.clone();
        message
    }

    pub fn error(text: impl Into<String>) -> Self {
        let mut message = Self::new(Role::Assistant, text);
        message.is_error = true;
        message
    }
}

/// 对话历史与统计
#[derive(Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
    research_count: usize,
}

impl ChatHistory {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 已完成的调研次数
    pub fn research_count(&self) -> usize {
        self.research_count
    }

    pub fn push_question(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::question(text));
    }

    pub fn push_outcome(&mut self, outcome: &ResearchOutcome) {
        self.messages.push(ChatMessage::report(outcome));
        self.research_count += 1;
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::error(text));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.research_count = 0;
    }
}

/// 提交状态机
///
/// `Idle -> Submitted -> (RunningPipeline | RunningFallback) -> Rendered -> Idle`，
/// 页面展示过结果后回到`Idle`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitted,
    RunningPipeline,
    RunningFallback,
    Rendered,
}

impl SubmissionPhase {
    /// 忙碌提示文本
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "Ready",
            SubmissionPhase::Submitted => "📝 Preparing research...",
            SubmissionPhase::RunningPipeline => "🤖 AI agents are researching...",
            SubmissionPhase::RunningFallback => "🔍 Searching the web...",
            SubmissionPhase::Rendered => "✅ Research completed!",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::Submitted
                | SubmissionPhase::RunningPipeline
                | SubmissionPhase::RunningFallback
        )
    }
}
