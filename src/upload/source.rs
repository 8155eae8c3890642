//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将"外部输入"和"流水线中间结果"解耦：
//! - `FileSelection` / `SelectedFile` 表示用户的原始选择
//! - `AcceptedFile` 表示已通过校验、媒体类型已确定的单个文件
//! - `ImageMeta` 表示解码后的图片元信息，随下一次有效上传整体替换

use bytes::Bytes;

use super::UploadError;

/// 文件选择的来源（仅用于日志）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Picker,
    Drop,
}

/// 用户选择的单个文件。
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// 原始文件名。
    pub name: String,
    /// 选择器提供的媒体类型；为空时根据文件签名识别。
    pub media_type: Option<String>,
    /// 文件内容。
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes: bytes.into(),
        }
    }
}

/// 一次文件选择（可能为空，也可能包含多个文件）。
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub origin: SelectionOrigin,
    pub files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn picked(files: Vec<SelectedFile>) -> Self {
        Self {
            origin: SelectionOrigin::Picker,
            files,
        }
    }

    pub fn dropped(files: Vec<SelectedFile>) -> Self {
        Self {
            origin: SelectionOrigin::Drop,
            files,
        }
    }
}

/// 支持的光栅图片类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    /// 解析媒体类型字符串，仅接受 JPEG / PNG。
    pub fn parse(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// 通过校验的文件。
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Bytes,
}

/// 预览句柄。持有图片字节的共享引用，最后一个句柄被丢弃时释放。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle(Bytes);

impl PreviewHandle {
    pub fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 图片元信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pixel_width: u32,
    pixel_height: u32,
    display_name: String,
    preview: PreviewHandle,
}

impl ImageMeta {
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        display_name: impl Into<String>,
        preview: PreviewHandle,
    ) -> Result<Self, UploadError> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(UploadError::Decode(format!(
                "image has no pixels ({}x{})",
                pixel_width, pixel_height
            )));
        }

        Ok(Self {
            pixel_width,
            pixel_height,
            display_name: display_name.into(),
            preview,
        })
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}
