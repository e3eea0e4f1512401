use serde::{Serialize, Serializer};
use thiserror::Error;

/// 单个研究问题允许的最大字符数
pub const MAX_QUERY_CHARS: usize = 1000;

/// 用户输入的研究问题，构造时保证非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query is empty")]
    Empty,
    #[error("Query is too long ({0} characters, at most {MAX_QUERY_CHARS} allowed)")]
    TooLong(usize),
}

impl Query {
    /// 校验并规范化用户输入，去除首尾空白
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }

        let chars = trimmed.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(QueryError::TooLong(chars));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let query = Query::parse("  What is quantum computing?\n").unwrap();
        assert_eq!(query.as_str(), "What is quantum computing?");
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
        assert_eq!(Query::parse(" \t\n "), Err(QueryError::Empty));
    }

    #[test]
    fn test_too_long_rejected() {
        let raw = "a".repeat(MAX_QUERY_CHARS + 1);
        assert_eq!(
            Query::parse(&raw),
            Err(QueryError::TooLong(MAX_QUERY_CHARS + 1))
        );
        assert!(Query::parse(&"a".repeat(MAX_QUERY_CHARS)).is_ok());
    }
}
