use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::search_result::SearchResult;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,2})\s+(.+?)\s*#*\s*$").expect("valid heading regex"));

/// 报告中的一个章节，body为Markdown文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// 最终展示给用户的研究报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
    pub citations: Vec<SearchResult>,
}

impl Report {
    pub fn new(
        title: impl Into<String>,
        sections: Vec<ReportSection>,
        citations: Vec<SearchResult>,
    ) -> Self {
        Self {
            title: title.into(),
            sections,
            citations,
        }
    }

    /// 报告中没有任何有内容的章节
    pub fn is_empty(&self) -> bool {
        self.sections
            .iter()
            .all(|s| s.title.trim().is_empty() && s.body.trim().is_empty())
    }

    /// 将Markdown文本按`#`/`##`标题切分为章节
    ///
    /// 正文之前的第一个一级标题作为报告标题，第一个标题之前的内容归入"Overview"章节。
    /// 代码块内的`#`行不会被当作标题。
    pub fn from_markdown(
        default_title: &str,
        markdown: &str,
        citations: Vec<SearchResult>,
    ) -> Self {
        let mut title: Option<String> = None;
        let mut preamble: Vec<&str> = Vec::new();
        let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
        let mut in_fence = false;

        for line in markdown.lines() {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
            }

            let heading = if in_fence {
                None
            } else {
                HEADING.captures(line.trim_end())
            };

            match heading {
                Some(caps) => {
                    let level = caps[1].len();
                    let text = caps[2].trim().to_string();
                    let nothing_yet = sections.is_empty()
                        && preamble.iter().all(|l| l.trim().is_empty());
                    if level == 1 && title.is_none() && nothing_yet {
                        title = Some(text);
                    } else {
                        sections.push((text, Vec::new()));
                    }
                }
                None => match sections.last_mut() {
                    Some((_, body)) => body.push(line),
                    None => preamble.push(line),
                },
            }
        }

        let mut result = Vec::with_capacity(sections.len() + 1);
        let preamble = preamble.join("\n").trim().to_string();
        if !preamble.is_empty() {
            result.push(ReportSection::new("Overview", preamble));
        }
        result.extend(
            sections
                .into_iter()
                .map(|(title, body)| ReportSection::new(title, body.join("\n").trim())),
        );

        Self::new(
            title.unwrap_or_else(|| default_title.to_string()),
            result,
            citations,
        )
    }

    /// 渲染为Markdown文本，`include_sources`为true时在末尾附上参考来源
    pub fn to_markdown(&self, include_sources: bool) -> String {
        let mut out = format!("# {}\n", self.title);
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n{}\n", section.title, section.body));
        }
        if include_sources && !self.citations.is_empty() {
            out.push_str("\n## Sources\n\n");
            for (i, c) in self.citations.iter().enumerate() {
                out.push_str(&format!("{}. [{}]({})\n", i + 1, c.title, c.url));
            }
        }
        out
    }
}
