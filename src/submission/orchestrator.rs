//! # 提交编排器
//!
//! ## 设计思路
//!
//! 状态机：`Idle → Submitting → Succeeded | Failed → Idle`。
//!
//! `Succeeded` / `Failed` 是瞬时结果：`settle` 在同一步内回到 `Idle`，
//! `state()` 不会停留在这两个值上，结果通过 `settle` 的返回值与 `last_outcome()` 暴露。
//!
//! - `Submitting` 期间触发器禁用，重复提交直接忽略
//! - 每次提交前先清空上一次的网格，失败时网格保持为空
//! - 无论成功、失败、解析异常还是任务 panic，`settle` 之后一定回到 `Idle`
//!
//! 同一时刻最多只有一个后台任务，句柄由编排器独占。

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::client::ConversionService;
use super::request::ConversionRequest;
use super::response::OutputGrid;
use super::RequestError;

/// 提交状态。`state()` 只会是 `Idle` 或 `Submitting`，其余两个值仅作为结果出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// 提交编排器。
pub struct SubmissionOrchestrator<S> {
    service: Arc<S>,
    state: SubmissionState,
    in_flight: Option<JoinHandle<Result<OutputGrid, RequestError>>>,
    output: OutputGrid,
    error: Option<RequestError>,
    last_outcome: Option<SubmissionState>,
}

impl<S: ConversionService> SubmissionOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self::with_shared(Arc::new(service))
    }

    pub fn with_shared(service: Arc<S>) -> Self {
        Self {
            service,
            state: SubmissionState::Idle,
            in_flight: None,
            output: OutputGrid::default(),
            error: None,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// 最近一次提交的结果（`Succeeded` / `Failed`）。
    pub fn last_outcome(&self) -> Option<SubmissionState> {
        self.last_outcome
    }

    pub fn output(&self) -> &OutputGrid {
        &self.output
    }

    /// 最近一次提交的错误，用于内联展示。
    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn is_trigger_enabled(&self) -> bool {
        self.state != SubmissionState::Submitting
    }

    /// 后台任务是否已结束（可以无等待地 `settle`）。
    pub fn is_ready(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(false)
    }

    /// 上传被拒绝或更换图片时清空结果。
    pub fn clear_output(&mut self) {
        self.output = OutputGrid::default();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 发起提交；`Submitting` 期间返回 `false` 且不产生任何请求。
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn submit(&mut self, request: ConversionRequest) -> bool {
        if self.state == SubmissionState::Submitting {
            log::debug!("⏳ 已有提交进行中，忽略本次触发");
            return false;
        }

        self.output = OutputGrid::default();
        self.error = None;
        self.state = SubmissionState::Submitting;

        log::info!(
            "🚀 开始提交 - 文件: {} 尺寸: {}x{}",
            request.file_name,
            request.width,
            request.height
        );

        let service = Arc::clone(&self.service);
        self.in_flight = Some(tokio::spawn(async move {
            let reply = service.convert(request).await?;
            reply.into_grid()
        }));
        true
    }

    /// 等待进行中的提交结束并落定状态；没有进行中的提交时返回 `None`。
    pub async fn settle(&mut self) -> Option<SubmissionState> {
        let handle = self.in_flight.take()?;

        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(RequestError::Task(join_error.to_string())),
        };

        let outcome = match result {
            Ok(grid) => {
                log::info!("✅ 转换成功 - {} 行", grid.rows().len());
                self.output = grid;
                self.error = None;
                SubmissionState::Succeeded
            }
            Err(error) => {
                log::warn!("❌ 转换失败：{}", error);
                self.output = OutputGrid::default();
                self.error = Some(error);
                SubmissionState::Failed
            }
        };

        log::debug!("🔁 提交结束（{:?}），回到 Idle", outcome);
        self.state = SubmissionState::Idle;
        self.last_outcome = Some(outcome);
        Some(outcome)
    }
}

impl<S> Drop for SubmissionOrchestrator<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use crate::submission::{ConversionOptions, ServiceReply};
    use crate::upload::MediaType;
    use bytes::Bytes;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Clone)]
    enum Reply {
        Ok(ServiceReply),
        Err(RequestError),
        Panic,
    }

    struct MockService {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        reply: Reply,
    }

    impl MockService {
        fn new(reply: Reply) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                reply,
            }
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(reply)
            }
        }
    }

    impl ConversionService for MockService {
        fn convert(
            &self,
            _request: ConversionRequest,
        ) -> impl Future<Output = Result<ServiceReply, RequestError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.clone();
            let reply = self.reply.clone();
            async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                match reply {
                    Reply::Ok(reply) => Ok(reply),
                    Reply::Err(error) => Err(error),
                    Reply::Panic => panic!("conversion task exploded"),
                }
            }
        }
    }

    fn request() -> ConversionRequest {
        ConversionRequest {
            file_name: "cat.png".to_string(),
            media_type: MediaType::Png,
            image: Bytes::from_static(b"png"),
            width: 4,
            height: 2,
            options: ConversionOptions::default(),
            theme: Theme::Light,
        }
    }

    fn ok(body: &'static str) -> Reply {
        Reply::Ok(ServiceReply::new(200, body))
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(MockService::gated(ok(r#"["ab"]"#), Arc::clone(&gate)));
        let mut orchestrator = SubmissionOrchestrator::with_shared(Arc::clone(&service));

        assert!(orchestrator.submit(request()));
        assert_eq!(orchestrator.state(), SubmissionState::Submitting);
        assert!(!orchestrator.is_trigger_enabled());
        assert!(!orchestrator.submit(request()));

        gate.notify_one();
        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Succeeded));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
        assert!(orchestrator.is_trigger_enabled());
    }

    #[tokio::test]
    async fn outcome_is_reported_while_state_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(MockService::gated(ok(r#"["ab"]"#), Arc::clone(&gate)));
        let mut orchestrator = SubmissionOrchestrator::with_shared(service);

        assert!(!orchestrator.is_ready());
        assert!(orchestrator.submit(request()));
        assert!(!orchestrator.is_ready());

        gate.notify_one();
        while !orchestrator.is_ready() {
            tokio::task::yield_now().await;
        }
        assert_eq!(orchestrator.state(), SubmissionState::Submitting);

        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Succeeded));
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
        assert_eq!(orchestrator.last_outcome(), Some(SubmissionState::Succeeded));
        assert!(!orchestrator.is_ready());
        assert_eq!(orchestrator.settle().await, None);
    }

    #[tokio::test]
    async fn success_populates_grid_and_clears_error() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(ok(r#"["@@", ".."]"#)));

        assert!(orchestrator.submit(request()));
        orchestrator.settle().await;

        assert_eq!(orchestrator.output().transcript(), "@@\n..");
        assert_eq!(orchestrator.error(), None);
        assert_eq!(orchestrator.last_outcome(), Some(SubmissionState::Succeeded));
    }

    #[tokio::test]
    async fn failure_leaves_grid_cleared_and_surfaces_message() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(Reply::Ok(
            ServiceReply::new(400, r#"{"error": "height is too large"}"#),
        )));
        orchestrator.output = OutputGrid::from_lines(["old"]);

        assert!(orchestrator.submit(request()));
        assert!(orchestrator.output().is_empty());
        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Failed));

        assert!(orchestrator.output().is_empty());
        assert_eq!(
            orchestrator.error().map(ToString::to_string).as_deref(),
            Some("height is too large")
        );
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn transport_error_returns_to_idle() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(Reply::Err(
            RequestError::Transport("connection refused".to_string()),
        )));

        orchestrator.submit(request());
        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Failed));
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
        assert!(orchestrator
            .error()
            .is_some_and(|error| error.to_string().contains("connection refused")));
    }

    #[tokio::test]
    async fn malformed_success_body_still_returns_to_idle() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(ok("not json")));

        orchestrator.submit(request());
        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Failed));
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
        assert!(orchestrator.submit(request()));
    }

    #[tokio::test]
    async fn panicking_task_is_reported_and_recovers() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(Reply::Panic));

        orchestrator.submit(request());
        assert_eq!(orchestrator.settle().await, Some(SubmissionState::Failed));
        assert!(matches!(orchestrator.error(), Some(RequestError::Task(_))));
        assert_eq!(orchestrator.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn settle_without_submission_is_noop() {
        let mut orchestrator = SubmissionOrchestrator::new(MockService::new(ok("[]")));
        assert_eq!(orchestrator.settle().await, None);
        assert_eq!(orchestrator.last_outcome(), None);
    }
}
