//! # 加载与解码模块
//!
//! ## 设计思路
//!
//! 只读取图片头获取像素宽高，不做完整解码：字符画尺寸推导只需要宽高比，
//! 真正的像素处理在远端转换服务完成。
//!
//! ## 实现思路
//!
//! - 本地文件：存在性 + metadata 体积限制 + 读取。
//! - 签名识别：`infer` 判断文件头，仅接受图片类。
//! - 解码：`image::ImageReader` 猜测格式并读取头部尺寸，格式必须为 JPEG / PNG。

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use super::source::{AcceptedFile, ImageMeta, PreviewHandle, SelectedFile};
use super::{UploadError, UploadLimits};

/// 根据文件签名识别媒体类型；非图片或无法识别返回 `None`。
pub fn sniff_media_type(bytes: &[u8]) -> Option<String> {
    let kind = infer::get(bytes)?;
    if kind.matcher_type() != infer::MatcherType::Image {
        log::debug!("🔎 文件签名不是图片类型：{}", kind.mime_type());
        return None;
    }
    Some(kind.mime_type().to_string())
}

/// 从本地路径读取文件，作为一次选择中的单个文件。
///
/// 媒体类型留空，由校验阶段按签名识别。
pub fn read_selected_file(path: &Path, limits: &UploadLimits) -> Result<SelectedFile, UploadError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    if !path.exists() {
        return Err(UploadError::Unreadable(format!("{} does not exist", path.display())));
    }

    let metadata = std::fs::metadata(path).map_err(|e| UploadError::Unreadable(e.to_string()))?;
    if metadata.len() > limits.max_file_size {
        return Err(UploadError::TooLarge {
            size: metadata.len(),
            limit: limits.max_file_size,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| UploadError::Unreadable(e.to_string()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SelectedFile::new(name, None, bytes))
}

/// 读取图片头中的像素宽高，构建 `ImageMeta`。
pub fn decode_image_meta(file: &AcceptedFile) -> Result<ImageMeta, UploadError> {
    let reader = ImageReader::new(Cursor::new(file.bytes.as_ref()))
        .with_guessed_format()
        .map_err(|e| UploadError::Decode(e.to_string()))?;

    match reader.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
        Some(other) => {
            log::warn!("🚫 {} 声明为 {}，实际内容为 {:?}", file.name, file.media_type.as_str(), other);
            return Err(UploadError::UnsupportedType {
                media_type: other.to_mime_type().to_string(),
            });
        }
        None => {
            return Err(UploadError::Decode("unrecognised image data".to_string()));
        }
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| UploadError::Decode(e.to_string()))?;

    log::info!("✅ 图片头解码成功 - 文件: {} 尺寸: {}x{}", file.name, width, height);

    ImageMeta::new(width, height, file.name.clone(), PreviewHandle::new(file.bytes.clone()))
}
