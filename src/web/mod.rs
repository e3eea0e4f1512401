//! 调研助手的Web界面与JSON接口

pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

pub use state::AppState;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::types::QueryError;

/// 创建应用路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Web层错误
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Research task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Web层结果
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            WebError::Server(_) | WebError::Template(_) | WebError::Task(_) => {
                error!("❌ {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
