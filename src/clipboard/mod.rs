//! 剪贴板模块
//!
//! # 设计思路
//!
//! 把"写入剪贴板"和"确认提示"分开：
//! - **写入**：`ClipboardSink` 抽象，生产实现 `SystemClipboard` 基于 `arboard`，
//!   在 `spawn_blocking` 中执行并对"剪贴板被占用"做有限次重试
//! - **提示**：`ClipboardFeedbackController` 负责成功 / 失败确认的显示与自动消失，
//!   任意时刻最多一个可见提示，新的激活会取消旧的消失计时器
//!
//! # 实现思路
//!
//! - 提示状态是控制器与计时器任务之间唯一的共享单元，用 `Arc<Mutex<_>>` 保护，
//!   并用代数（generation）判断计时器是否已过期。
//! - 写入失败不向上抛错，而是转成失败提示，用户可再次点击重试。

mod feedback;
mod sink;

pub use feedback::{Acknowledgment, ClipboardFeedbackController, FeedbackKind};
pub use sink::{ClipboardSink, SystemClipboard};

/// 剪贴板错误（ClipboardError）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard is not available: {0}")]
    Unavailable(String),

    #[error("Clipboard is busy: {0}")]
    Busy(String),

    #[error("Clipboard task failed: {0}")]
    Task(String),
}
