use clap::Parser;

/// Research Assistant - 基于多智能体的AI调研助手
#[derive(Parser, Debug)]
#[command(name = "research-assistant")]
#[command(
    about = "AI research assistant: a web page that answers questions with a crew of research agents, falling back to plain web search results when no language model is available."
)]
#[command(version)]
pub struct Args {
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// 监听端口
    #[arg(short, long, default_value_t = 8501)]
    pub port: u16,
}

impl Args {
    /// 服务监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
