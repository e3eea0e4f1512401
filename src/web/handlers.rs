//! HTTP请求处理

use askama::Template;
use axum::{
    Form, Json,
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::research::{Capabilities, HealthStatus, ResearchOutcome};
use crate::types::{Query, QueryError, Report};
use crate::web::session::SubmissionPhase;
use crate::web::templates::IndexTemplate;
use crate::web::{AppState, WebResult};

/// 出错提示中保留的问题长度
const ECHO_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub phase: SubmissionPhase,
    pub phase_label: &'static str,
    pub busy: bool,
    pub research_count: usize,
    pub messages: usize,
}

/// 主页面
pub async fn index(State(state): State<AppState>) -> WebResult<Html<String>> {
    let page = {
        let history = state.history.read().await;
        IndexTemplate::new(&state.settings, &history, state.phase()).render()?
    };
    state.acknowledge_rendered();
    Ok(Html(page))
}

/// 表单提交：空问题不做任何事，过长问题在对话中提示错误
pub async fn submit_research(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Redirect {
    match Query::parse(&form.query) {
        Ok(query) => {
            // 失败已记录在对话历史中
            let _ = state.submit(&query).await;
        }
        Err(QueryError::Empty) => {
            debug!("忽略空白的调研请求");
        }
        Err(e) => {
            state.reject(&echo(&form.query), &e.to_string()).await;
        }
    }
    Redirect::to("/")
}

pub async fn clear_history(State(state): State<AppState>) -> Redirect {
    state.clear().await;
    Redirect::to("/")
}

/// JSON接口：执行完整调研
pub async fn api_research(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> WebResult<Json<ResearchOutcome>> {
    let query = Query::parse(&request.query)?;
    Ok(Json(state.submit(&query).await?))
}

/// JSON接口：只做搜索，不经过智能体
pub async fn api_quick_search(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> WebResult<Json<Report>> {
    let query = Query::parse(&request.query)?;
    Ok(Json(state.service.quick_search(&query).await))
}

pub async fn api_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health().await)
}

pub async fn api_capabilities(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.service.capabilities())
}

pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    let phase = state.phase();
    let history = state.history.read().await;
    Json(StatusResponse {
        phase,
        phase_label: phase.label(),
        busy: phase.is_busy(),
        research_count: history.research_count(),
        messages: history.len(),
    })
}

fn echo(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= ECHO_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(ECHO_CHARS).collect();
        format!("{}...", head)
    }
}
