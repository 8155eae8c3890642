//! # 请求错误模型

/// 转换请求失败（RequestError）。
///
/// 文案会原样展示在表单内联错误区，用户修改后重新提交即可恢复。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// 服务端返回的错误消息（`{ "error": ... }`）或 `HTTP <status>`。
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Could not reach the conversion service: {0}")]
    Transport(String),

    #[error("The conversion service did not respond within {0} seconds.")]
    Timeout(u64),

    #[error("Unexpected response from the conversion service: {0}")]
    MalformedResponse(String),

    #[error("Invalid conversion option: {0}")]
    InvalidOption(String),

    /// 后台任务 panic 或被取消。
    #[error("The conversion task stopped unexpectedly: {0}")]
    Task(String),
}
