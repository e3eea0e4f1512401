use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{error, info};

use crate::config::Settings;
use crate::research::{ResearchOutcome, ResearchService, ResearchStage};
use crate::types::Query;
use crate::web::WebResult;
use crate::web::session::{ChatHistory, SubmissionPhase};

/// Web服务共享状态
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub service: Arc<ResearchService>,
    pub history: Arc<RwLock<ChatHistory>>,
    phase: Arc<watch::Sender<SubmissionPhase>>,
    /// 同一时间只允许一个调研在执行
    gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(service: ResearchService) -> Self {
        let (phase, _) = watch::channel(SubmissionPhase::Idle);
        Self {
            settings: service.settings().clone(),
            service: Arc::new(service),
            history: Arc::new(RwLock::new(ChatHistory::default())),
            phase: Arc::new(phase),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.borrow()
    }

    fn set_phase(&self, phase: SubmissionPhase) {
        self.phase.send_replace(phase);
    }

    /// 页面展示过结果后回到空闲状态
    pub fn acknowledge_rendered(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == SubmissionPhase::Rendered {
                *phase = SubmissionPhase::Idle;
                true
            } else {
                false
            }
        });
    }

    /// 执行一次提交：记录问题，执行调研，记录报告
    ///
    /// 调研在独立任务中执行，请求被取消时仍会完成并写入历史。
    pub async fn submit(&self, query: &Query) -> WebResult<ResearchOutcome> {
        let state = self.clone();
        let query = query.clone();
        let task = tokio::spawn(async move { state.run_submission(&query).await });

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("❌ 调研任务异常结束: {}", e);
                self.history
                    .write()
                    .await
                    .push_error("❌ Research failed unexpectedly, please try again.");
                self.set_phase(SubmissionPhase::Idle);
                Err(e.into())
            }
        }
    }

    async fn run_submission(&self, query: &Query) -> ResearchOutcome {
        let _guard = self.gate.lock().await;
        info!("📝 收到调研请求: {}", query);

        self.set_phase(SubmissionPhase::Submitted);
        self.history.write().await.push_question(query.as_str());

        let outcome = self
            .service
            .run_observed(query, |stage| {
                self.set_phase(match stage {
                    ResearchStage::Pipeline => SubmissionPhase::RunningPipeline,
                    ResearchStage::Fallback => SubmissionPhase::RunningFallback,
                })
            })
            .await;

        self.history.write().await.push_outcome(&outcome);
        self.set_phase(SubmissionPhase::Rendered);
        outcome
    }

    /// 记录一个无法执行的提交
    pub async fn reject(&self, raw: &str, message: &str) {
        let _guard = self.gate.lock().await;
        let mut history = self.history.write().await;
        history.push_question(raw);
        history.push_error(format!("❌ {}", message));
    }

    pub async fn clear(&self) {
        let _guard = self.gate.lock().await;
        self.history.write().await.clear();
        self.set_phase(SubmissionPhase::Idle);
    }
}
