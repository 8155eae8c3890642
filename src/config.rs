//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有"可调策略"集中到 `AppConfig`：尺寸上限、预设表、转换服务地址、
//! 网络超时、上传体积限制、确认提示停留时长。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - 配置文件为 JSON，缺失字段回退默认值（`#[serde(default)]`）。
//! - 文件不存在视为使用默认配置；文件损坏或取值越界返回 `ConfigError`。
//! - 预设表在这里一次性校验并构建为只读 `PresetRegistry`。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::preset::{
    builtin_presets, PresetDefinition, PresetRegistry, DEFAULT_MAX_LENGTH, DEFAULT_PRESET_KEY,
};
use crate::upload::UploadLimits;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/";
pub const DEFAULT_BRIGHTNESS: f64 = 50.0;

/// 配置错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("读取配置文件失败：{0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置文件失败：{0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置取值非法：{0}")]
    Invalid(String),
}

/// 应用配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 宽 / 高全局上限（字符数）。
    pub max_length: u32,
    /// 上传被拒绝后回退到的预设。
    pub default_preset: String,
    /// 预设表（顺序即展示顺序）。
    pub presets: Vec<PresetDefinition>,
    /// 转换服务地址。
    pub endpoint: String,
    /// 建立连接超时（秒）。
    pub connect_timeout_secs: u64,
    /// 整个请求超时（秒）。
    pub request_timeout_secs: u64,
    /// 允许上传的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 复制确认提示的自动消失延迟（毫秒）。
    pub ack_dismiss_ms: u64,
    /// 亮度默认值（0~100）。
    pub default_brightness: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            default_preset: DEFAULT_PRESET_KEY.to_string(),
            presets: builtin_presets(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 8,
            request_timeout_secs: 60,
            max_file_size: 20 * 1024 * 1024,
            ack_dismiss_ms: 1_500,
            default_brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置；文件不存在时返回默认配置。
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("⚙️ 配置文件不存在，使用默认配置 - 路径: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        log::info!(
            "⚙️ 已加载配置 - 路径: {} max_length={} presets={}",
            path.display(),
            config.max_length,
            config.presets.len()
        );
        Ok(config)
    }

    /// 写回 JSON 文件。
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 校验各项取值范围。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10_000).contains(&self.max_length) {
            return Err(ConfigError::Invalid("max_length 必须在 1~10000 之间".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint 不能为空".to_string()));
        }
        if !(1..=120).contains(&self.connect_timeout_secs) {
            return Err(ConfigError::Invalid("connect_timeout_secs 必须在 1~120 秒之间".to_string()));
        }
        if !(1..=600).contains(&self.request_timeout_secs) {
            return Err(ConfigError::Invalid("request_timeout_secs 必须在 1~600 秒之间".to_string()));
        }
        if self.connect_timeout_secs > self.request_timeout_secs {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs 不能大于 request_timeout_secs".to_string(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid("max_file_size 必须大于 0".to_string()));
        }
        if !(100..=60_000).contains(&self.ack_dismiss_ms) {
            return Err(ConfigError::Invalid("ack_dismiss_ms 必须在 100~60000 毫秒之间".to_string()));
        }
        if !(0.0..=100.0).contains(&self.default_brightness) {
            return Err(ConfigError::Invalid("default_brightness 必须在 0~100 之间".to_string()));
        }

        PresetRegistry::new(self.presets.clone(), &self.default_preset, self.max_length)?;
        Ok(())
    }

    /// 构建只读预设注册表。
    pub fn registry(&self) -> Result<PresetRegistry, ConfigError> {
        PresetRegistry::new(self.presets.clone(), &self.default_preset, self.max_length)
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size: self.max_file_size,
        }
    }

    pub fn ack_dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.ack_dismiss_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
