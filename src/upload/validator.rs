//! # 上传校验
//!
//! 校验顺序：数量 → 体积 → 媒体类型。选择器未提供媒体类型时按文件签名识别。

use super::loader::sniff_media_type;
use super::source::{AcceptedFile, FileSelection, MediaType};
use super::{UploadError, UploadLimits};

/// 校验一次文件选择，返回唯一的合法文件。
///
/// # 示例
/// ```rust
/// use asciify::upload::{validate_selection, FileSelection, UploadError, UploadLimits};
///
/// let limits = UploadLimits { max_file_size: 1024 };
/// let result = validate_selection(FileSelection::picked(Vec::new()), &limits);
/// assert_eq!(result.unwrap_err(), UploadError::NoImageSelected);
/// ```
pub fn validate_selection(
    selection: FileSelection,
    limits: &UploadLimits,
) -> Result<AcceptedFile, UploadError> {
    let origin = selection.origin;
    let mut files = selection.files;

    if files.len() > 1 {
        log::warn!("🚫 拒绝上传：一次选择了 {} 个文件（来源 {:?}）", files.len(), origin);
        return Err(UploadError::MultipleFiles { count: files.len() });
    }

    let Some(file) = files.pop() else {
        log::warn!("🚫 拒绝上传：未选择文件（来源 {:?}）", origin);
        return Err(UploadError::NoImageSelected);
    };

    let size = file.bytes.len() as u64;
    if size > limits.max_file_size {
        log::warn!("🚫 拒绝上传：{} 体积 {} 字节超过限制 {}", file.name, size, limits.max_file_size);
        return Err(UploadError::TooLarge {
            size,
            limit: limits.max_file_size,
        });
    }

    let declared = file
        .media_type
        .clone()
        .filter(|media_type| !media_type.trim().is_empty());
    let media_type = match declared {
        Some(media_type) => media_type,
        None => sniff_media_type(&file.bytes).unwrap_or_default(),
    };

    let Some(media_type) = MediaType::parse(&media_type) else {
        log::warn!("🚫 拒绝上传：{} 类型 {:?} 不受支持", file.name, media_type);
        return Err(UploadError::UnsupportedType { media_type });
    };

    log::info!("📥 接受上传 - 文件: {} 类型: {} 大小: {} 字节", file.name, media_type.as_str(), size);

    Ok(AcceptedFile {
        name: file.name,
        media_type,
        bytes: file.bytes,
    })
}
