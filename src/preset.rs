//! # 预设尺寸注册表
//!
//! ## 设计思路
//!
//! 预设表在启动时由配置构建一次，此后只读；尺寸推导与上限收敛通过引用显式接收，
//! 不再依赖按字符串键访问的全局可变表。
//!
//! `custom` 为保留键：没有固定宽度（由用户输入），高度上限等于全局 `max_length`。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// 保留的自定义尺寸键。
pub const CUSTOM_PRESET_KEY: &str = "custom";

/// 宽 / 高允许的全局最大值（字符数）。
pub const DEFAULT_MAX_LENGTH: u32 = 500;

/// 默认激活的预设。
pub const DEFAULT_PRESET_KEY: &str = "small";

/// 单个预设定义。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDefinition {
    pub key: String,
    /// 固定输出宽度；`custom` 为 `None`。
    #[serde(default)]
    pub fixed_width: Option<u32>,
    /// 高度上限；`None` 表示只受全局上限约束。
    #[serde(default)]
    pub max_height: Option<u32>,
}

impl PresetDefinition {
    pub fn fixed(key: impl Into<String>, fixed_width: u32, max_height: Option<u32>) -> Self {
        Self {
            key: key.into(),
            fixed_width: Some(fixed_width),
            max_height,
        }
    }

    pub fn custom() -> Self {
        Self {
            key: CUSTOM_PRESET_KEY.to_string(),
            fixed_width: None,
            max_height: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.key == CUSTOM_PRESET_KEY
    }

    /// 实际生效的高度上限，永远不超过全局上限。
    pub fn height_bound(&self, max_length: u32) -> u32 {
        self.max_height.map_or(max_length, |h| h.min(max_length))
    }
}

/// 内置预设表（顺序即展示顺序）。
pub fn builtin_presets() -> Vec<PresetDefinition> {
    vec![
        PresetDefinition::fixed("twitch", 30, Some(15)),
        PresetDefinition::fixed("discord", 32, Some(62)),
        PresetDefinition::fixed("small", 30, None),
        PresetDefinition::fixed("medium", 60, None),
        PresetDefinition::fixed("large", 120, None),
        PresetDefinition::custom(),
    ]
}

/// 只读预设注册表。
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<PresetDefinition>,
    index: HashMap<String, usize>,
    default_key: String,
    max_length: u32,
}

impl PresetRegistry {
    /// 校验并构建注册表。
    ///
    /// # 示例
    /// ```rust
    /// use asciify::preset::{builtin_presets, PresetRegistry};
    ///
    /// let registry = PresetRegistry::new(builtin_presets(), "small", 500)?;
    /// assert_eq!(registry.definition_for("medium").and_then(|p| p.fixed_width), Some(60));
    /// # Ok::<(), asciify::config::ConfigError>(())
    /// ```
    pub fn new(
        presets: Vec<PresetDefinition>,
        default_key: &str,
        max_length: u32,
    ) -> Result<Self, ConfigError> {
        if max_length == 0 {
            return Err(ConfigError::Invalid("max_length 必须大于 0".to_string()));
        }
        if presets.is_empty() {
            return Err(ConfigError::Invalid("预设表不能为空".to_string()));
        }

        let mut index = HashMap::with_capacity(presets.len());
        for (position, preset) in presets.iter().enumerate() {
            if preset.key.trim().is_empty() {
                return Err(ConfigError::Invalid("预设键不能为空".to_string()));
            }
            if index.insert(preset.key.clone(), position).is_some() {
                return Err(ConfigError::Invalid(format!("预设键重复：{}", preset.key)));
            }

            match (preset.is_custom(), preset.fixed_width) {
                (true, Some(_)) => {
                    return Err(ConfigError::Invalid("custom 预设不能设置固定宽度".to_string()));
                }
                (false, None) | (false, Some(0)) => {
                    return Err(ConfigError::Invalid(format!(
                        "预设 {} 的固定宽度必须大于 0",
                        preset.key
                    )));
                }
                _ => {}
            }

            if preset.max_height == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "预设 {} 的高度上限必须大于 0",
                    preset.key
                )));
            }
        }

        if !index.contains_key(CUSTOM_PRESET_KEY) {
            return Err(ConfigError::Invalid("预设表缺少 custom".to_string()));
        }
        if !index.contains_key(default_key) {
            return Err(ConfigError::Invalid(format!("默认预设不存在：{}", default_key)));
        }

        Ok(Self {
            presets,
            index,
            default_key: default_key.to_string(),
            max_length,
        })
    }

    /// 内置预设 + 默认上限。
    pub fn builtin() -> Self {
        let presets = builtin_presets();
        let index = presets
            .iter()
            .enumerate()
            .map(|(position, preset)| (preset.key.clone(), position))
            .collect();

        Self {
            presets,
            index,
            default_key: DEFAULT_PRESET_KEY.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn definition_for(&self, key: &str) -> Option<&PresetDefinition> {
        self.index.get(key).map(|&position| &self.presets[position])
    }

    pub fn all_keys(&self) -> Vec<&str> {
        self.presets.iter().map(|preset| preset.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetDefinition> {
        self.presets.iter()
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn max_length(&self) -> u32 {
        self.max_length
    }
}
