use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use research_assistant::cli::Args;
use research_assistant::config::Settings;
use research_assistant::logging::init_logging;
use research_assistant::pipeline::CrewPipelineFactory;
use research_assistant::research::ResearchService;
use research_assistant::search::DuckDuckGoSearch;
use research_assistant::web::{AppState, create_app};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    let settings = Arc::new(Settings::from_env());
    init_logging(&settings);

    if !settings.has_openai_key() {
        warn!(
            "⚠️ OPENAI_API_KEY 未设置，将尝试使用本地模型 {} ({})，不可用时降级为搜索结果报告",
            settings.ollama_model, settings.ollama_host
        );
    }

    let search = Arc::new(DuckDuckGoSearch::new(&settings));
    let factory = Arc::new(CrewPipelineFactory::new(search.clone()));
    let service = ResearchService::new(settings.clone(), search, factory);
    let app = create_app(AppState::new(service));

    let address = args.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法监听地址 {}", address))?;

    info!("🚀 AI Research Assistant 已启动: http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
