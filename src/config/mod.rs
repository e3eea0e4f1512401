use std::time::Duration;

/// 环境变量名称
pub mod env_keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const CREWAI_VERBOSE: &str = "CREWAI_VERBOSE";
    pub const CREWAI_DEBUG: &str = "CREWAI_DEBUG";
    pub const MAX_SEARCH_RESULTS: &str = "MAX_SEARCH_RESULTS";
    pub const SEARCH_TIMEOUT: &str = "SEARCH_TIMEOUT";
    pub const OLLAMA_HOST: &str = "OLLAMA_HOST";
    pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";
}

pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: f64 = 30.0;
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// LLM Provider类型
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[default]
    OpenAI,
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

/// 应用程序配置，启动时从环境变量读取一次，之后只读
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// OpenAI API KEY，未设置或为空白时为None
    pub openai_api_key: Option<String>,

    /// 是否输出详细的Agent执行日志
    pub verbose: bool,

    /// 是否启用调试日志
    pub debug: bool,

    /// 每次搜索返回的最大结果数
    pub max_search_results: usize,

    /// 搜索超时时间
    pub search_timeout: Duration,

    /// 本地Ollama服务地址
    pub ollama_host: String,

    /// 本地Ollama模型名称
    pub ollama_model: String,

    /// LLM调用配置
    pub llm: LLMConfig,
}

/// LLM调用配置，均为固定默认值
#[derive(Debug, Clone, PartialEq)]
pub struct LLMConfig {
    /// 配置了API KEY时使用的OpenAI模型
    pub openai_model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 整个Agent流水线的时间预算（秒）
    pub timeout_seconds: u64,

    /// 探测本地模型服务是否可达的超时时间（秒）
    pub probe_timeout_seconds: u64,

    /// 带工具Agent的最大多轮对话次数
    pub max_tool_turns: usize,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            openai_model: String::from(DEFAULT_OPENAI_MODEL),
            max_tokens: 4096,
            temperature: 0.1,
            retry_attempts: 2,
            retry_delay_ms: 1000,
            timeout_seconds: 300,
            probe_timeout_seconds: 3,
            max_tool_turns: 4,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            verbose: true,
            debug: false,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            search_timeout: Duration::from_secs_f64(DEFAULT_SEARCH_TIMEOUT_SECS),
            ollama_host: String::from(DEFAULT_OLLAMA_HOST),
            ollama_model: String::from(DEFAULT_OLLAMA_MODEL),
            llm: LLMConfig::default(),
        }
    }
}

impl Settings {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过查找函数加载配置，缺失或格式错误的值回退到默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let openai_api_key = lookup(env_keys::OPENAI_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let verbose = lookup(env_keys::CREWAI_VERBOSE)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.verbose);

        let debug = lookup(env_keys::CREWAI_DEBUG)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.debug);

        let max_search_results = lookup(env_keys::MAX_SEARCH_RESULTS)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_search_results);

        let search_timeout = lookup(env_keys::SEARCH_TIMEOUT)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(defaults.search_timeout);

        let ollama_host = lookup(env_keys::OLLAMA_HOST)
            .map(|host| host.trim().trim_end_matches('/').to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or(defaults.ollama_host);

        let ollama_model = lookup(env_keys::OLLAMA_MODEL)
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .unwrap_or(defaults.ollama_model);

        Self {
            openai_api_key,
            verbose,
            debug,
            max_search_results,
            search_timeout,
            ollama_host,
            ollama_model,
            llm: defaults.llm,
        }
    }

    /// 是否配置了OpenAI API KEY
    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// 根据可用配置选择LLM Provider：有API KEY时使用OpenAI，否则使用本地Ollama
    pub fn llm_provider(&self) -> LLMProvider {
        if self.has_openai_key() {
            LLMProvider::OpenAI
        } else {
            LLMProvider::Ollama
        }
    }

    /// 当前Provider使用的模型名称
    pub fn model_name(&self) -> &str {
        match self.llm_provider() {
            LLMProvider::OpenAI => &self.llm.openai_model,
            LLMProvider::Ollama => &self.ollama_model,
        }
    }

    pub fn pipeline_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.probe_timeout_seconds)
    }
}

/// 解析布尔开关，无法识别时返回None
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
