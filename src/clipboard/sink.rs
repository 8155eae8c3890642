//! # 剪贴板写入

use std::future::Future;
use std::time::Duration;

use super::ClipboardError;

const DEFAULT_WRITE_ATTEMPTS: u8 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 60;

/// 纯文本剪贴板写入端。
pub trait ClipboardSink: Send + Sync + 'static {
    fn write_text(&self, text: String) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// 系统剪贴板（`arboard`）。
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    attempts: u8,
    retry_delay: Duration,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_WRITE_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl SystemClipboard {
    pub fn new(attempts: u8, retry_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    fn try_write(text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Busy(e.to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: String) -> Result<(), ClipboardError> {
        let attempts = self.attempts;
        let retry_delay = self.retry_delay;
        log::debug!("📋 准备写入剪贴板 - {} 字符", text.chars().count());

        tokio::task::spawn_blocking(move || {
            let mut last_error = ClipboardError::Unavailable("no attempt made".to_string());

            for attempt in 1..=attempts {
                if attempt > 1 {
                    log::debug!("🔄 重试 {}/{}", attempt, attempts);
                    std::thread::sleep(retry_delay);
                }

                match Self::try_write(&text) {
                    Ok(()) => {
                        log::info!("✅ 复制成功 (尝试 {})", attempt);
                        return Ok(());
                    }
                    Err(ClipboardError::Busy(message)) => {
                        log::warn!("❌ 尝试 {} 失败：{}", attempt, message);
                        last_error = ClipboardError::Busy(message);
                    }
                    Err(other) => return Err(other),
                }
            }

            Err(last_error)
        })
        .await
        .map_err(|e| ClipboardError::Task(format!("线程执行失败：{}", e)))?
    }
}
