//! # 上限收敛与警告
//!
//! 推导出的尺寸超过上限时直接收敛到上限。只有在保持宽高比时，这种收敛才意味着
//! 比例无法保持，此时给出警告；未锁定宽高比时上限只是普通边界，静默收敛。

/// 被收敛的轴，决定警告文案中的名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Self::Width => "Width",
            Self::Height => "Height",
        }
    }
}

/// 尺寸警告。每次推导都会重新计算，不能单独修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningState {
    active: bool,
    message: String,
}

impl WarningState {
    pub fn cleared() -> Self {
        Self::default()
    }

    fn aspect_ratio_lost(axis: Axis, bound: u32) -> Self {
        Self {
            active: true,
            message: format!(
                "Aspect Ratio cannot be maintained. {} cannot exceed {}.",
                axis.label(),
                bound
            ),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 收敛结果：展示值 + 对应警告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constrained {
    pub value: u32,
    pub warning: WarningState,
}

/// 将推导值收敛到 `[1, bound]`，并按宽高比锁状态决定是否警告。
///
/// # 示例
/// ```rust
/// use asciify::dimension::{constrain, Axis};
///
/// let clamped = constrain(40, 15, Axis::Height, true);
/// assert_eq!(clamped.value, 15);
/// assert_eq!(
///     clamped.warning.message(),
///     "Aspect Ratio cannot be maintained. Height cannot exceed 15."
/// );
/// ```
pub fn constrain(computed: u32, bound: u32, axis: Axis, aspect_locked: bool) -> Constrained {
    let bound = bound.max(1);

    if computed <= bound {
        return Constrained {
            value: computed.max(1),
            warning: WarningState::cleared(),
        };
    }

    let warning = if aspect_locked {
        log::debug!("⚠️ {} 推导值 {} 超过上限 {}，无法保持宽高比", axis.label(), computed, bound);
        WarningState::aspect_ratio_lost(axis, bound)
    } else {
        WarningState::cleared()
    };

    Constrained {
        value: bound,
        warning,
    }
}

/// 用户原始输入先收敛到 `[1, max_length]`，再参与任何比例计算。
pub fn sanitize_field_input(raw: i64, max_length: u32) -> u32 {
    raw.clamp(1, i64::from(max_length.max(1))) as u32
}
