//! # 尺寸模块（dimension）
//!
//! ## 设计思路
//!
//! 将"宽高推导 → 上限收敛 + 警告 → 选择状态"拆成三层：
//!
//! - `resolver`：纯函数，按图片像素宽高比推导宽 / 高
//! - `constraint`：把推导值收敛到上限，并在宽高比无法保持时给出警告
//! - `state`：持有当前图片元信息、激活预设、自定义宽高与宽高比锁
//!
//! 字符单元格大约是"高为宽的两倍"，所以高度按比例缩放后再减半。
//!
//! ## 调用链
//!
//! ```text
//! 新图片 / 切换预设 / 编辑宽高
//!    ↓
//! state.rs（选择状态 + 预设高度缓存）
//!    ├─ resolver.rs（宽高推导）
//!    └─ constraint.rs（上限收敛 + 警告）
//! ```

mod constraint;
mod resolver;
mod state;

pub use constraint::{constrain, sanitize_field_input, Axis, Constrained, WarningState};
pub use resolver::{height_from_width, width_from_height, PresetHeights};
pub use state::{DimensionSelection, DimensionState, DEFAULT_CUSTOM_WIDTH};

/// 尺寸选择操作错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    #[error("未知预设：{0}")]
    UnknownPreset(String),

    #[error("预设 {0} 的宽高由图片推导，不可直接编辑")]
    ReadOnly(String),

    #[error("预设 {0} 强制保持宽高比")]
    AspectLockForced(String),
}
