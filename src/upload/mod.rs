//! # 上传模块（upload）
//!
//! ## 设计思路
//!
//! 文件选择（选择器或拖放）到图片元信息的过程拆分为：
//!
//! - `source`：外部输入模型（`FileSelection` / `SelectedFile`）与中间结果（`AcceptedFile` / `ImageMeta`）
//! - `validator`：数量、类型、体积校验，尽早失败
//! - `loader`：读取本地文件、签名识别、解码图片头获取像素宽高
//! - `error`：统一的上传校验错误
//!
//! 校验失败对本次尝试是终止性的：调用方负责把依赖状态重置为基线。
//!
//! ## 调用链
//!
//! ```text
//! FileSelection
//!    ↓
//! validator.rs（数量 → 体积 → 媒体类型）
//!    ↓ AcceptedFile
//! loader.rs（解码图片头 → ImageMeta）
//! ```

mod error;
mod loader;
mod source;
mod validator;

pub use error::UploadError;
pub use loader::{decode_image_meta, read_selected_file, sniff_media_type};
pub use source::{
    AcceptedFile, FileSelection, ImageMeta, MediaType, PreviewHandle, SelectedFile,
    SelectionOrigin,
};
pub use validator::validate_selection;

/// 上传限制。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// 允许的最大文件体积（字节）。
    pub max_file_size: u64,
}
