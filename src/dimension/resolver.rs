//! # 宽高推导
//!
//! 两个方向的推导并不对称：
//! - 宽 → 高：先按比例缩放再四舍五入，最小为 1；
//! - 高 → 宽：先四舍五入再乘 2，没有下限。
//!
//! 该差异保持原样，`constraint` 层对输入的下限收敛保证展示值不小于 1。

use std::collections::HashMap;

use crate::preset::PresetRegistry;

/// 给定输出宽度，推导保持图片宽高比的输出高度。
///
/// 图片像素宽高需为正数。
///
/// # 示例
/// ```rust
/// use asciify::dimension::height_from_width;
///
/// // 2:1 图片，宽 30 → 30 * 400 / 800 / 2 = 7.5 → 8
/// assert_eq!(height_from_width(30, 800, 400), 8);
/// ```
pub fn height_from_width(width: u32, image_width: u32, image_height: u32) -> u32 {
    debug_assert!(image_width > 0 && image_height > 0);
    let scaled = f64::from(width) * f64::from(image_height) / f64::from(image_width) / 2.0;
    (scaled.round() as u32).max(1)
}

/// 给定输出高度，推导保持图片宽高比的输出宽度。
///
/// # 示例
/// ```rust
/// use asciify::dimension::width_from_height;
///
/// assert_eq!(width_from_height(8, 800, 400), 32);
/// ```
pub fn width_from_height(height: u32, image_width: u32, image_height: u32) -> u32 {
    debug_assert!(image_width > 0 && image_height > 0);
    let scaled = f64::from(height) * f64::from(image_width) / f64::from(image_height);
    (scaled.round() as u32).saturating_mul(2)
}

/// 每个预设针对当前图片推导出的（未收敛）高度。
///
/// 新图片被接受时一次性为所有预设计算，之后切换预设直接读缓存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetHeights {
    heights: HashMap<String, u32>,
}

impl PresetHeights {
    /// 固定宽度超过全局上限时按上限推导，与展示的宽度一致。
    pub fn compute(registry: &PresetRegistry, image_width: u32, image_height: u32) -> Self {
        let max_length = registry.max_length();
        let heights = registry
            .iter()
            .filter_map(|preset| {
                preset.fixed_width.map(|width| {
                    (
                        preset.key.clone(),
                        height_from_width(width.min(max_length), image_width, image_height),
                    )
                })
            })
            .collect();

        Self { heights }
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.heights.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn clear(&mut self) {
        self.heights.clear();
    }
}
