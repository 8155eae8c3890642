//! # 偏好设置
//!
//! 主题偏好保存在单独的 JSON 文件（`{"theme": "dark"}`）中：启动时读取，
//! 文件缺失或损坏时回退到系统偏好；切换主题时写回。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const APP_DIR_NAME: &str = "asciify";

/// 界面主题，同时作为转换请求中的 `theme` 字段发送。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// 终端背景色推断的系统偏好（`COLORFGBG`，形如 `15;0`）。
    pub fn system_preference() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::from_colorfgbg(&value))
            .unwrap_or_default()
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        // 0-6 与 8 是深色背景
        if background <= 6 || background == 8 {
            Some(Self::Dark)
        } else {
            Some(Self::Light)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// 应用配置目录（`<config_dir>/asciify`）。
pub fn app_config_dir() -> Result<PathBuf, AppError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::Storage("获取应用配置目录失败".to_string()))
}

/// 默认的 `AppConfig` 文件路径。
pub fn default_config_path() -> Result<PathBuf, AppError> {
    Ok(app_config_dir()?.join("config.json"))
}

/// 主题偏好存储。
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Result<Self, AppError> {
        Ok(Self::new(app_config_dir()?.join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取已保存的主题；文件不存在返回 `None`。
    pub fn load(&self) -> Result<Option<Theme>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let parsed = serde_json::from_str::<ThemeFile>(&content)
            .map_err(|e| AppError::Storage(format!("解析设置文件失败: {}", e)))?;

        Ok(Some(parsed.theme))
    }

    /// 读取主题，任何失败都回退到 `fallback`。
    pub fn load_or(&self, fallback: Theme) -> Theme {
        match self.load() {
            Ok(Some(theme)) => theme,
            Ok(None) => fallback,
            Err(e) => {
                log::warn!("⚠️ 读取主题偏好失败，使用 {}：{}", fallback.as_str(), e);
                fallback
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("创建应用数据目录失败: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&ThemeFile { theme })
            .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;

        fs::write(&self.path, content)?;
        log::debug!("🎨 主题偏好已保存：{}", theme.as_str());
        Ok(())
    }
}
