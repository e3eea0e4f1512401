//! 服务端渲染模板

use askama::Template;

use crate::config::Settings;
use crate::types::SearchResult;
use crate::web::session::{ChatHistory, ChatMessage, Role, SubmissionPhase};

pub const APP_TITLE: &str = "🔬 AI Research Assistant";

/// 主页面模板
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
    pub version: &'static str,
    pub status: StatusView,
    pub messages: Vec<MessageView>,
    pub research_count: usize,
    pub message_count: usize,
    pub phase_label: &'static str,
    pub busy: bool,
}

/// 侧边栏中的系统状态
pub struct StatusView {
    pub openai_configured: bool,
    pub provider: String,
    pub model: String,
    pub max_search_results: usize,
    pub search_timeout_secs: String,
}

impl StatusView {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            openai_configured: settings.has_openai_key(),
            provider: settings.llm_provider().to_string(),
            model: settings.model_name().to_string(),
            max_search_results: settings.max_search_results,
            search_timeout_secs: format!("{}", settings.search_timeout.as_secs_f64()),
        }
    }
}

/// 一条消息的展示数据，`html`已由Markdown渲染
pub struct MessageView {
    pub is_user: bool,
    pub is_error: bool,
    pub timestamp: String,
    pub html: String,
    pub mode: &'static str,
    pub citations: Vec<SearchResult>,
}

impl MessageView {
    fn from_message(message: &ChatMessage) -> Self {
        let html = match message.role {
            // 用户输入按纯文本展示
            Role::User => format!("<p>{}</p>", escape_html(&message.content)),
            Role::Assistant => markdown::to_html(&message.content),
        };

        Self {
            is_user: message.role == Role::User,
            is_error: message.is_error,
            timestamp: message.timestamp.format("%H:%M:%S").to_string(),
            html,
            mode: message.mode.unwrap_or(""),
            citations: message.citations.clone(),
        }
    }
}

impl IndexTemplate {
    pub fn new(settings: &Settings, history: &ChatHistory, phase: SubmissionPhase) -> Self {
        Self {
            title: APP_TITLE,
            version: env!("CARGO_PKG_VERSION"),
            status: StatusView::from_settings(settings),
            messages: history
                .messages()
                .iter()
                .map(MessageView::from_message)
                .collect(),
            research_count: history.research_count(),
            message_count: history.len(),
            phase_label: phase.label(),
            busy: phase.is_busy(),
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
