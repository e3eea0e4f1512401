use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// 根据配置计算默认日志过滤规则，`RUST_LOG`存在时以其为准
pub fn default_filter(settings: &Settings) -> String {
    let level = if settings.debug {
        "debug"
    } else if settings.verbose {
        "info"
    } else {
        "warn"
    };
    format!("research_assistant={},tower_http={}", level, level)
}

/// 初始化日志
pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(settings)));

    // 测试中可能被重复初始化，忽略已安装的订阅者
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_follows_flags() {
        let verbose = Settings::default();
        assert_eq!(
            default_filter(&verbose),
            "research_assistant=info,tower_http=info"
        );

        let quiet = Settings {
            verbose: false,
            ..Default::default()
        };
        assert_eq!(
            default_filter(&quiet),
            "research_assistant=warn,tower_http=warn"
        );

        let debug = Settings {
            verbose: false,
            debug: true,
            ..Default::default()
        };
        assert!(default_filter(&debug).starts_with("research_assistant=debug"));
    }
}
