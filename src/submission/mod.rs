//! # 提交模块（submission）
//!
//! ## 设计思路
//!
//! 把"一次转换"拆成四块，各自可单独测试：
//!
//! - `request`：请求负载（图片 + 宽高 + 转换选项 + 主题），预设键永不发送
//! - `response`：响应解析，字符串行 / 单字符数组行统一为 `OutputGrid`
//! - `client`：`ConversionService` 抽象与 multipart HTTP 实现
//! - `orchestrator`：Idle → Submitting → Succeeded / Failed → Idle 状态机
//!
//! ## 调用链
//!
//! ```text
//! Workbench::handle(SubmitRequested)
//!    ↓
//! SubmissionOrchestrator::submit(ConversionRequest)
//!    ↓ tokio::spawn
//! ConversionService::convert → ServiceReply
//!    ↓
//! ServiceReply::into_grid → OutputGrid / RequestError
//!    ↓
//! SubmissionOrchestrator::settle（必定回到 Idle）
//! ```

mod client;
mod error;
mod orchestrator;
mod request;
mod response;

pub use client::{ConversionService, HttpConversionClient};
pub use error::RequestError;
pub use orchestrator::{SubmissionOrchestrator, SubmissionState};
pub use request::{ConversionOptions, ConversionRequest, ConversionStyle};
pub use response::{parse_error_message, parse_grid, OutputGrid, ServiceReply};
