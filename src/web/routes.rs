//! 路由定义

use axum::{
    Router,
    routing::{get, post},
};

use crate::web::{AppState, handlers};

/// 页面路由
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/research", post(handlers::submit_research))
        .route("/clear", post(handlers::clear_history))
}

/// JSON接口路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/research", post(handlers::api_research))
        .route("/search", post(handlers::api_quick_search))
        .route("/health", get(handlers::api_health))
        .route("/capabilities", get(handlers::api_capabilities))
        .route("/status", get(handlers::api_status))
}
