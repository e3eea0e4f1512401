use crate::types::Query;

/// LLM调用方式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMCallMode {
    /// 使用prompt方法，返回泛化推理文本
    Prompt,
    /// 使用prompt方法，并提供网页搜索工具
    PromptWithTools,
}

/// Agent角色设定
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 任务描述
    pub task_description: String,
    /// 期望的输出
    pub expected_output: &'static str,
    /// 结尾的强调性指令
    pub closing_instruction: &'static str,
    /// LLM调用方式
    pub llm_call_mode: LLMCallMode,
}

/// 流水线中的一个智能体
pub trait CrewAgent: Send + Sync {
    fn agent_type(&self) -> &'static str;

    fn profile(&self) -> AgentProfile;

    fn prompt_template(&self, query: &Query) -> PromptTemplate;

    /// 系统提示词，由角色设定拼接而成
    fn system_prompt(&self) -> String {
        let profile = self.profile();
        format!(
            "You are a {}.\nYour goal: {}\n{}",
            profile.role, profile.goal, profile.backstory
        )
    }

    /// 用户提示词：任务描述 + 上一步的产出 + 期望输出
    fn user_prompt(&self, query: &Query, context: Option<&str>) -> String {
        let template = self.prompt_template(query);
        let mut prompt = format!("## Task\n{}\n", template.task_description);

        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!(
                "\n## Context from the previous step\n{}\n",
                context.trim()
            ));
        }

        prompt.push_str(&format!(
            "\n## Expected output\n{}\n\n{}",
            template.expected_output, template.closing_instruction
        ));
        prompt
    }
}

#[derive(Default)]
pub struct WebResearcher;

impl CrewAgent for WebResearcher {
    fn agent_type(&self) -> &'static str {
        "WebResearcher"
    }

    fn profile(&self) -> AgentProfile {
        AgentProfile {
            role: "Web Research Specialist",
            goal: "Find comprehensive and relevant information from web sources",
            backstory: "You are an expert web researcher with skills in finding accurate, up-to-date information from reliable sources.",
        }
    }

    fn prompt_template(&self, query: &Query) -> PromptTemplate {
        PromptTemplate {
            task_description: format!(
                "Search for comprehensive information about: {}. Focus on finding current, accurate, and relevant sources. Use the web_search tool for follow-up searches when the initial results are not enough.",
                query
            ),
            expected_output: "Detailed search results with multiple sources and relevant information. Keep the url of every source you rely on.",
            closing_instruction: "Report the facts you found with their source urls.",
            llm_call_mode: LLMCallMode::PromptWithTools,
        }
    }
}

#[derive(Default)]
pub struct ResearchAnalyst;

impl CrewAgent for ResearchAnalyst {
    fn agent_type(&self) -> &'static str {
        "ResearchAnalyst"
    }

    fn profile(&self) -> AgentProfile {
        AgentProfile {
            role: "Research Analyst",
            goal: "Analyze search results and extract key insights and patterns",
            backstory: "You are a skilled analyst who can identify important information, trends, and insights from multiple sources.",
        }
    }

    fn prompt_template(&self, query: &Query) -> PromptTemplate {
        PromptTemplate {
            task_description: format!(
                "Analyze the search results about \"{}\" and identify key points, trends, and important insights.",
                query
            ),
            expected_output: "Structured analysis highlighting key findings and insights.",
            closing_instruction: "Only use information present in the research notes.",
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}

#[derive(Default)]
pub struct TechnicalWriter;

impl CrewAgent for TechnicalWriter {
    fn agent_type(&self) -> &'static str {
        "TechnicalWriter"
    }

    fn profile(&self) -> AgentProfile {
        AgentProfile {
            role: "Technical Writer",
            goal: "Create well-structured, comprehensive research reports",
            backstory: "You are an expert technical writer who creates clear, organized, and informative reports with proper citations.",
        }
    }

    fn prompt_template(&self, query: &Query) -> PromptTemplate {
        PromptTemplate {
            task_description: format!(
                "Create a comprehensive research report answering \"{}\" based on the analysis, including proper structure and citations.",
                query
            ),
            expected_output: "A well-formatted Markdown research report: a `# ` title line, then `## ` sections such as Executive Summary, Key Findings and Conclusion, citing sources inline as Markdown links.",
            closing_instruction: "Return only the Markdown report.",
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}
