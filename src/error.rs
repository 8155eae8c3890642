//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 各子模块各自定义领域错误（校验 / 请求 / 剪贴板 / 配置 / 尺寸），
//! 这里用 `AppError` 汇总，供 `Workbench` 与 CLI 统一处理。
//! 核心链路中没有致命错误：每条失败路径都回到可操作的稳定状态。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为各领域错误提供 `From` 转换，调用侧直接 `?`。
//! - 实现 `Serialize` 将错误序列化为字符串，方便前端直接展示。

use serde::Serialize;

use crate::clipboard::ClipboardError;
use crate::config::ConfigError;
use crate::dimension::DimensionError;
use crate::submission::RequestError;
use crate::upload::UploadError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 上传文件未通过校验（数量 / 类型 / 体积 / 解码）
    #[error("{0}")]
    Validation(#[from] UploadError),

    /// 转换服务返回失败或网络异常
    #[error("{0}")]
    Request(#[from] RequestError),

    /// 剪贴板写入失败
    #[error("{0}")]
    Clipboard(#[from] ClipboardError),

    /// 尺寸选择操作不合法（只读字段、未知预设）
    #[error("{0}")]
    Dimension(#[from] DimensionError),

    /// 配置文件缺失字段或取值越界
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 偏好存储不可用
    #[error("存储不可用: {0}")]
    Storage(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
