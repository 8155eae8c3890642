//! # 工作台（事件适配层）
//!
//! ## 设计思路
//!
//! `Workbench` 是各组件状态的唯一所有者，所有 UI 事件都经由 `handle` 顺序处理，
//! 因此尺寸选择、提交状态与输出网格都不需要加锁。
//!
//! 上传顺序保证：每次通过校验的上传分配一个递增代数，图片头解码在
//! `spawn_blocking` 中进行；解码完成时若代数已不是最新，结果直接丢弃。
//!
//! ## 调用链
//!
//! ```text
//! handle(UiEvent)
//!    ├─ FilesSelected / FilesDropped → validate_selection → spawn_blocking(decode_image_meta)
//!    │                                   └─ finish_upload → apply_decoded（代数检查）
//!    ├─ （提交任务已结束）→ SubmissionOrchestrator::settle
//!    ├─ PresetChosen / WidthEdited / ... → DimensionState
//!    ├─ SubmitRequested → SubmissionOrchestrator::submit
//!    └─ OutputActivated → ClipboardFeedbackController::activate
//! ```

mod events;

pub use events::{parse_brightness_input, parse_dimension_input, UiEvent};

use tokio::task::JoinHandle;

use crate::clipboard::{ClipboardFeedbackController, ClipboardSink, FeedbackKind};
use crate::config::AppConfig;
use crate::dimension::{DimensionSelection, DimensionState, WarningState};
use crate::error::AppError;
use crate::preset::PresetRegistry;
use crate::settings::{Theme, ThemeStore};
use crate::submission::{
    ConversionOptions, ConversionRequest, ConversionService, OutputGrid, RequestError,
    SubmissionOrchestrator, SubmissionState,
};
use crate::upload::{
    decode_image_meta, validate_selection, AcceptedFile, FileSelection, ImageMeta, UploadError,
};

struct PendingDecode {
    generation: u64,
    file: AcceptedFile,
    handle: JoinHandle<Result<ImageMeta, UploadError>>,
}

/// 工作台：持有全部客户端状态。
pub struct Workbench<S, C> {
    config: AppConfig,
    registry: PresetRegistry,
    dimensions: DimensionState,
    options: ConversionOptions,
    options_visible: bool,
    error: Option<String>,
    theme: Theme,
    theme_store: Option<ThemeStore>,
    upload_generation: u64,
    pending_decode: Option<PendingDecode>,
    accepted: Option<AcceptedFile>,
    submission: SubmissionOrchestrator<S>,
    clipboard: ClipboardFeedbackController<C>,
}

impl<S: ConversionService, C: ClipboardSink> Workbench<S, C> {
    pub fn new(config: AppConfig, service: S, sink: C, theme: Theme) -> Result<Self, AppError> {
        let registry = config.registry()?;
        let options = ConversionOptions::with_brightness(config.default_brightness)?;
        let dimensions = DimensionState::new(&registry);
        let clipboard = ClipboardFeedbackController::new(sink, config.ack_dismiss_delay());

        log::info!(
            "🧰 工作台初始化 - 预设: {:?} 默认: {} 上限: {}",
            registry.all_keys(),
            registry.default_key(),
            registry.max_length()
        );

        Ok(Self {
            config,
            registry,
            dimensions,
            options,
            options_visible: false,
            error: None,
            theme,
            theme_store: None,
            upload_generation: 0,
            pending_decode: None,
            accepted: None,
            submission: SubmissionOrchestrator::new(service),
            clipboard,
        })
    }

    /// 切换主题时写回偏好文件。
    pub fn with_theme_store(mut self, store: ThemeStore) -> Self {
        self.theme_store = Some(store);
        self
    }

    // ------------------------------------------------------------------------
    // 只读视图
    // ------------------------------------------------------------------------

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &DimensionSelection {
        self.dimensions.selection()
    }

    pub fn warning(&self) -> &WarningState {
        self.dimensions.warning()
    }

    pub fn image(&self) -> Option<&ImageMeta> {
        self.dimensions.image()
    }

    pub fn is_dimension_editable(&self) -> bool {
        self.dimensions.is_editable()
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn options_visible(&self) -> bool {
        self.options_visible
    }

    /// 内联错误：上传错误优先，其次是最近一次提交的错误。
    pub fn error(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.submission.error().map(ToString::to_string))
    }

    pub fn submission_error(&self) -> Option<&RequestError> {
        self.submission.error()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn output(&self) -> &OutputGrid {
        self.submission.output()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    pub fn last_outcome(&self) -> Option<SubmissionState> {
        self.submission.last_outcome()
    }

    /// 任务已结束但尚未落定时同样可用：下一个事件会先落定再处理。
    pub fn is_submit_enabled(&self) -> bool {
        self.submission.is_trigger_enabled() || self.submission.is_ready()
    }

    pub fn acknowledgment(&self) -> Option<FeedbackKind> {
        self.clipboard.visible()
    }

    pub fn upload_generation(&self) -> u64 {
        self.upload_generation
    }

    // ------------------------------------------------------------------------
    // 事件处理
    // ------------------------------------------------------------------------

    /// 处理一个 UI 事件。
    ///
    /// 已结束的提交任务在分发事件前先落定，触发器随之恢复可用。
    /// 返回的错误仅用于调用方展示或退出码，状态已经回到可继续操作的位置。
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), AppError> {
        if self.submission.is_ready() {
            self.submission.settle().await;
        }

        let event = match event.into_selection() {
            Ok(selection) => return self.begin_upload(selection),
            Err(event) => event,
        };

        match event {
            UiEvent::PresetChosen(key) => {
                self.dimensions.select_preset(&self.registry, &key)?;
            }
            UiEvent::AspectLockToggled(locked) => {
                self.dimensions.set_aspect_lock(&self.registry, locked)?;
            }
            UiEvent::WidthEdited(raw) => match parse_dimension_input(&raw) {
                Some(value) => self.dimensions.edit_width(&self.registry, value)?,
                None => log::debug!("✏️ 忽略无法解析的宽度输入：{:?}", raw),
            },
            UiEvent::HeightEdited(raw) => match parse_dimension_input(&raw) {
                Some(value) => self.dimensions.edit_height(&self.registry, value)?,
                None => log::debug!("✏️ 忽略无法解析的高度输入：{:?}", raw),
            },
            UiEvent::BrightnessEdited(raw) => match parse_brightness_input(&raw) {
                Some(value) => self.options.set_brightness_clamped(value),
                None => log::debug!("✏️ 忽略无法解析的亮度输入：{:?}", raw),
            },
            UiEvent::StyleChosen(raw) => {
                self.options.style = raw.parse()?;
            }
            UiEvent::InvertToggled(invert) => {
                self.options.invert = invert;
            }
            UiEvent::SubmitRequested => self.submit().await?,
            UiEvent::OutputActivated => {
                self.clipboard.activate(self.submission.output()).await;
            }
            UiEvent::ThemeToggled => self.toggle_theme(),
            UiEvent::FilesSelected(_) | UiEvent::FilesDropped(_) => {}
        }
        Ok(())
    }

    /// 等待最新一次上传的解码完成并应用。
    pub async fn finish_upload(&mut self) -> Result<(), AppError> {
        let Some(pending) = self.pending_decode.take() else {
            return Ok(());
        };

        let result = match pending.handle.await {
            Ok(result) => result,
            Err(e) => Err(UploadError::Decode(format!("解码任务失败：{}", e))),
        };

        self.apply_decoded(pending.generation, pending.file, result)?;
        Ok(())
    }

    /// 应用解码结果；代数过期返回 `Ok(false)` 且不做任何修改。
    pub fn apply_decoded(
        &mut self,
        generation: u64,
        file: AcceptedFile,
        result: Result<ImageMeta, UploadError>,
    ) -> Result<bool, AppError> {
        if generation != self.upload_generation {
            log::debug!(
                "🗑️ 丢弃过期的解码结果 - 文件: {} 代数: {} 当前: {}",
                file.name,
                generation,
                self.upload_generation
            );
            return Ok(false);
        }

        match result {
            Ok(meta) => {
                self.dimensions.apply_image(&self.registry, meta);
                self.accepted = Some(file);
                self.options_visible = true;
                self.error = None;
                self.submission.clear_output();
                self.submission.clear_error();
                Ok(true)
            }
            Err(error) => {
                self.reject_upload(&error);
                Err(error.into())
            }
        }
    }

    /// 等待进行中的提交结束。
    pub async fn settle_submission(&mut self) -> Option<SubmissionState> {
        self.submission.settle().await
    }

    fn begin_upload(&mut self, selection: FileSelection) -> Result<(), AppError> {
        self.upload_generation += 1;
        if let Some(stale) = self.pending_decode.take() {
            log::debug!("🗑️ 新的上传取代了未完成的解码（代数 {}）", stale.generation);
            stale.handle.abort();
        }

        let file = match validate_selection(selection, &self.config.upload_limits()) {
            Ok(file) => file,
            Err(error) => {
                self.reject_upload(&error);
                return Err(error.into());
            }
        };

        let decode_input = file.clone();
        let handle = tokio::task::spawn_blocking(move || decode_image_meta(&decode_input));
        self.pending_decode = Some(PendingDecode {
            generation: self.upload_generation,
            file,
            handle,
        });
        Ok(())
    }

    fn reject_upload(&mut self, error: &UploadError) {
        log::warn!("🚫 上传被拒绝，回到初始状态：{}", error);
        self.dimensions.reset(&self.registry);
        self.accepted = None;
        self.options_visible = false;
        self.submission.clear_output();
        self.error = Some(error.to_string());
    }

    async fn submit(&mut self) -> Result<(), AppError> {
        self.finish_upload().await?;

        let Some(file) = self.accepted.as_ref() else {
            let error = UploadError::NoImageSelected;
            self.error = Some(error.to_string());
            return Err(error.into());
        };

        let request = ConversionRequest::new(file, self.dimensions.selection(), self.options, self.theme);
        if !self.submission.submit(request) {
            log::debug!("⏳ 提交按钮处于禁用状态");
        }
        Ok(())
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        log::info!("🎨 切换主题：{}", self.theme.as_str());

        if let Some(store) = &self.theme_store {
            if let Err(e) = store.save(self.theme) {
                log::warn!("⚠️ 保存主题偏好失败：{}", e);
            }
        }
    }
}
