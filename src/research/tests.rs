#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::fallback::{NO_RESULTS_MESSAGE, SEARCH_RESULTS_SECTION};
    use crate::pipeline::{PipelineError, PipelineFactory, ResearchPipeline};
    use crate::research::{ResearchOutcome, ResearchService, ResearchStage};
    use crate::search::WebSearch;
    use crate::types::{Query, Report, ReportSection, SearchResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FixedSearch {
        results: Vec<SearchResult>,
        calls: AtomicUsize,
    }

    impl FixedSearch {
        fn new(results: Vec<SearchResult>) -> Arc<Self> {
            Arc::new(Self {
                results,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WebSearch for FixedSearch {
        async fn search(&self, _query: &str, max_results: usize) -> Vec<SearchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results.iter().take(max_results).cloned().collect()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct StaticPipeline(Result<Report, PipelineError>);

    #[async_trait]
    impl ResearchPipeline for StaticPipeline {
        async fn run(&self, _query: &Query) -> Result<Report, PipelineError> {
            self.0.clone()
        }
    }

    /// 按预设结果构造流水线的工厂
    enum StubFactory {
        Unavailable,
        Failing,
        Working,
    }

    #[async_trait]
    impl PipelineFactory for StubFactory {
        async fn build(
            &self,
            _settings: &Arc<Settings>,
        ) -> Result<Arc<dyn ResearchPipeline>, PipelineError> {
            match self {
                StubFactory::Unavailable => Err(PipelineError::Configuration(
                    "no model available".to_string(),
                )),
                StubFactory::Failing => Ok(Arc::new(StaticPipeline(Err(
                    PipelineError::Execution("model returned garbage".to_string()),
                )))),
                StubFactory::Working => Ok(Arc::new(StaticPipeline(Ok(agent_report())))),
            }
        }
    }

    fn agent_report() -> Report {
        Report::new(
            "Quantum Computing",
            vec![ReportSection::new("Executive Summary", "Qubits.")],
            vec![],
        )
    }

    fn three_results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("Result A", "Snippet A", "https://a.example.com"),
            SearchResult::new("Result B", "Snippet B", "https://b.example.com"),
            SearchResult::new("Result C", "Snippet C", "https://c.example.com"),
        ]
    }

    fn service(search: Arc<FixedSearch>, factory: StubFactory) -> ResearchService {
        ResearchService::new(Arc::new(Settings::default()), search, Arc::new(factory))
    }

    #[tokio::test]
    async fn test_pipeline_success_does_not_search() {
        let search = FixedSearch::new(three_results());
        let service = service(search.clone(), StubFactory::Working);
        let query = Query::parse("What is quantum computing?").unwrap();

        let outcome = service.run(&query).await;

        assert_eq!(
            outcome,
            ResearchOutcome::Pipeline {
                report: agent_report()
            }
        );
        assert_eq!(outcome.mode_label(), "AI agents");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_configuration_error_falls_back() {
        let search = FixedSearch::new(three_results());
        let service = service(search, StubFactory::Unavailable);
        let query = Query::parse("What is quantum computing?").unwrap();

        let outcome = service.run(&query).await;

        match &outcome {
            ResearchOutcome::Fallback { report, reason } => {
                assert!(reason.contains("no model available"));
                assert_eq!(report.sections.len(), 1);
                assert_eq!(report.sections[0].title, SEARCH_RESULTS_SECTION);
                assert_eq!(report.citations, three_results());
            }
            other => panic!("expected fallback, got {:?}", other),
        }
        assert!(outcome.is_fallback());
        assert_eq!(outcome.mode_label(), "Search fallback");
    }

    #[tokio::test]
    async fn test_execution_error_falls_back() {
        let service = service(FixedSearch::new(three_results()), StubFactory::Failing);
        let query = Query::parse("quantum").unwrap();

        let outcome = service.run(&query).await;

        assert!(outcome.is_fallback());
        assert!(!outcome.report().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_without_results_is_still_a_report() {
        let service = service(FixedSearch::new(vec![]), StubFactory::Unavailable);
        let query = Query::parse("quantum").unwrap();

        let report = service.run(&query).await.into_report();

        assert_eq!(report.sections[0].body, NO_RESULTS_MESSAGE);
        assert!(report.citations.is_empty());
    }

    #[tokio::test]
    async fn test_observer_sees_stages_in_order() {
        let service = service(FixedSearch::new(three_results()), StubFactory::Unavailable);
        let query = Query::parse("quantum").unwrap();
        let seen = Mutex::new(Vec::new());

        service
            .run_observed(&query, |stage| seen.lock().unwrap().push(stage))
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ResearchStage::Pipeline, ResearchStage::Fallback]
        );
    }

    #[tokio::test]
    async fn test_quick_search_respects_max_results() {
        let settings = Settings {
            max_search_results: 2,
            ..Default::default()
        };
        let service = ResearchService::new(
            Arc::new(settings),
            FixedSearch::new(three_results()),
            Arc::new(StubFactory::Working),
        );
        let query = Query::parse("quantum").unwrap();

        let report = service.quick_search(&query).await;
        assert_eq!(report.citations.len(), 2);
    }

    #[tokio::test]
    async fn test_health_reports_search_state() {
        let healthy = service(FixedSearch::new(three_results()), StubFactory::Working);
        let status = healthy.health().await;
        assert_eq!(status.status, "healthy");
        assert_eq!(status.probe_results, 1);
        assert_eq!(status.llm_provider, "ollama");
        assert!(!status.openai_configured);

        let degraded = service(FixedSearch::new(vec![]), StubFactory::Working);
        assert_eq!(degraded.health().await.status, "degraded");
    }

    #[test]
    fn test_capabilities_describe_settings() {
        let service = service(FixedSearch::new(vec![]), StubFactory::Working);
        let caps = service.capabilities();

        assert_eq!(caps.max_search_results, 5);
        assert_eq!(caps.model, "llama2");
        assert_eq!(caps.agents.len(), 3);
        assert!(caps.operations.contains(&"quick_search"));
    }

    #[tokio::test]
    async fn test_outcome_serializes_with_mode_tag() {
        let service = service(FixedSearch::new(three_results()), StubFactory::Unavailable);
        let query = Query::parse("quantum").unwrap();

        let json = serde_json::to_value(service.run(&query).await).unwrap();
        assert_eq!(json["mode"], "fallback");
        assert_eq!(json["report"]["citations"].as_array().unwrap().len(), 3);
    }
}
