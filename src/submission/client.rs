//! # 转换服务客户端
//!
//! ## 设计思路
//!
//! 编排器只依赖 `ConversionService` 抽象，测试可注入内存实现；
//! 生产实现 `HttpConversionClient` 以 multipart 表单 POST 到配置的地址。
//!
//! ## 实现思路
//!
//! - 客户端构建一次，连接超时与整体超时来自 `AppConfig`。
//! - 任意状态码都读完正文交给 `ServiceReply`，由调用方决定成功或失败。
//! - 超时 / 连接失败 / 其他传输错误分别映射为 `RequestError` 的不同分支。

use std::future::Future;

use reqwest::multipart::{Form, Part};

use crate::config::AppConfig;

use super::request::ConversionRequest;
use super::response::ServiceReply;
use super::RequestError;

/// 远端转换服务。
pub trait ConversionService: Send + Sync + 'static {
    fn convert(
        &self,
        request: ConversionRequest,
    ) -> impl Future<Output = Result<ServiceReply, RequestError>> + Send;
}

/// multipart HTTP 转换客户端。
#[derive(Debug, Clone)]
pub struct HttpConversionClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    request_timeout_secs: u64,
}

impl HttpConversionClient {
    pub fn new(config: &AppConfig) -> Result<Self, RequestError> {
        let endpoint = reqwest::Url::parse(config.endpoint.trim())
            .map_err(|e| RequestError::InvalidOption(format!("endpoint {:?}: {}", config.endpoint, e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| RequestError::Transport(format!("cannot build HTTP client: {}", e)))?;

        log::info!(
            "🌐 转换客户端就绪 - 地址: {} 连接超时: {}s 请求超时: {}s",
            endpoint,
            config.connect_timeout_secs,
            config.request_timeout_secs
        );

        Ok(Self {
            client,
            endpoint,
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    fn build_form(request: &ConversionRequest) -> Result<Form, RequestError> {
        let image = Part::bytes(request.image.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(request.media_type.as_str())
            .map_err(|e| RequestError::InvalidOption(format!("media type: {}", e)))?;

        let mut form = Form::new().part("image", image);
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }
        Ok(form)
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> RequestError {
        if e.is_timeout() {
            RequestError::Timeout(self.request_timeout_secs)
        } else if e.is_connect() {
            RequestError::Transport(format!("connection failed ({})", e))
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

impl ConversionService for HttpConversionClient {
    async fn convert(&self, request: ConversionRequest) -> Result<ServiceReply, RequestError> {
        log::info!(
            "📤 提交转换 - 文件: {} 尺寸: {}x{} 大小: {} 字节",
            request.file_name,
            request.width,
            request.height,
            request.image.len()
        );

        let form = Self::build_form(&request)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_reqwest_error(e))?;

        log::info!("📥 转换服务响应 - 状态: {} 正文: {} 字节", status, body.len());
        Ok(ServiceReply { status, body })
    }
}
