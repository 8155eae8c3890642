//! # 上传错误模型
//!
//! 文案直接展示给用户，保持英文原样。

/// 上传校验错误（ValidationError）。
///
/// 任何一种都会让依赖上传的状态回到基线，用户重新选择文件即可恢复。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("No image selected.")]
    NoImageSelected,

    #[error("You can only upload one image at a time.")]
    MultipleFiles { count: usize },

    #[error("File type not supported. Please upload a JPEG or PNG file.")]
    UnsupportedType { media_type: String },

    #[error(
        "File is too large: {:.2} MB (limit: {:.2} MB).",
        megabytes(.size),
        megabytes(.limit)
    )]
    TooLarge { size: u64, limit: u64 },

    #[error("Could not read the selected file: {0}")]
    Unreadable(String),

    #[error("Could not decode the image: {0}")]
    Decode(String),
}

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / 1024.0 / 1024.0
}
