//! # 复制确认提示
//!
//! ## 实现思路
//!
//! 1. 网格为空：不写剪贴板，也不显示提示
//! 2. 转写为纯文本（行之间以 `\n` 连接）后写入剪贴板
//! 3. 根据结果显示成功 / 失败提示，旧提示被直接替换
//! 4. 取消旧的消失计时器，启动新的计时器；计时器只会隐藏自己那一代的提示

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::submission::OutputGrid;

use super::sink::ClipboardSink;

/// 提示类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Failure,
}

impl FeedbackKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Copied to clipboard!",
            Self::Failure => "Failed to copy to clipboard.",
        }
    }
}

/// 当前提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    pub kind: FeedbackKind,
    pub visible: bool,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Acknowledgment>,
}

fn lock_slot(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// 复制 + 确认提示控制器。
pub struct ClipboardFeedbackController<C> {
    sink: Arc<C>,
    dismiss_after: Duration,
    slot: Arc<Mutex<Slot>>,
    expiry: Option<JoinHandle<()>>,
}

impl<C: ClipboardSink> ClipboardFeedbackController<C> {
    pub fn new(sink: C, dismiss_after: Duration) -> Self {
        Self::with_shared(Arc::new(sink), dismiss_after)
    }

    pub fn with_shared(sink: Arc<C>, dismiss_after: Duration) -> Self {
        Self {
            sink,
            dismiss_after,
            slot: Arc::new(Mutex::new(Slot::default())),
            expiry: None,
        }
    }

    /// 用户激活输出区域。网格为空时返回 `None`。
    pub async fn activate(&mut self, grid: &OutputGrid) -> Option<FeedbackKind> {
        if grid.is_empty() {
            log::debug!("📋 输出为空，忽略复制");
            return None;
        }

        let kind = match self.sink.write_text(grid.transcript()).await {
            Ok(()) => FeedbackKind::Success,
            Err(error) => {
                log::warn!("❌ 复制到剪贴板失败：{}", error);
                FeedbackKind::Failure
            }
        };

        self.show(kind);
        Some(kind)
    }

    /// 当前可见的提示。
    pub fn visible(&self) -> Option<FeedbackKind> {
        self.current()
            .filter(|ack| ack.visible)
            .map(|ack| ack.kind)
    }

    /// 最近一次提示（可能已隐藏）。
    pub fn current(&self) -> Option<Acknowledgment> {
        lock_slot(&self.slot).current
    }

    fn show(&mut self, kind: FeedbackKind) {
        if let Some(previous) = self.expiry.take() {
            previous.abort();
        }

        let generation = {
            let mut slot = lock_slot(&self.slot);
            slot.generation += 1;
            slot.current = Some(Acknowledgment {
                kind,
                visible: true,
                generation: slot.generation,
            });
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let delay = self.dismiss_after;
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock_slot(&slot);
            if slot.generation != generation {
                return;
            }
            if let Some(ack) = slot.current.as_mut() {
                ack.visible = false;
                log::debug!("⏱️ 复制提示已隐藏（第 {} 代）", generation);
            }
        }));
    }
}

impl<C> Drop for ClipboardFeedbackController<C> {
    fn drop(&mut self) {
        if let Some(expiry) = self.expiry.take() {
            expiry.abort();
        }
    }
}
