//! # 尺寸选择状态
//!
//! ## 设计思路
//!
//! 状态只通过这里的转换函数修改，注册表以引用显式传入：
//!
//! - 非 `custom` 预设：宽度固定，高度由图片推导，用户不可编辑；宽高比锁强制开启
//! - `custom` + 锁定：编辑一边，另一边按图片宽高比重新推导并收敛
//! - `custom` + 未锁定：两个字段互相独立
//!
//! 每次推导都会重新计算警告；警告只可能在锁定状态下出现。

use crate::preset::{PresetDefinition, PresetRegistry};
use crate::upload::ImageMeta;

use super::constraint::{constrain, sanitize_field_input, Axis, Constrained, WarningState};
use super::resolver::{height_from_width, width_from_height, PresetHeights};
use super::DimensionError;

/// 基线状态下 `custom` 预设使用的宽度。
pub const DEFAULT_CUSTOM_WIDTH: u32 = 50;

/// 当前激活的尺寸选择。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSelection {
    pub active_preset_key: String,
    pub width: u32,
    pub height: u32,
    pub aspect_locked: bool,
}

impl DimensionSelection {
    /// 没有图片时的基线：默认预设，按正方形图片推导高度。
    fn baseline(registry: &PresetRegistry) -> Self {
        let max_length = registry.max_length();
        let key = registry.default_key();
        let preset = registry.definition_for(key);
        let width = preset
            .and_then(|preset| preset.fixed_width)
            .unwrap_or(DEFAULT_CUSTOM_WIDTH)
            .clamp(1, max_length);
        let bound = preset
            .map(|preset| preset.height_bound(max_length))
            .unwrap_or(max_length);
        let height = height_from_width(width, 1, 1).min(bound);

        Self {
            active_preset_key: key.to_string(),
            width,
            height,
            aspect_locked: true,
        }
    }
}

/// 尺寸相关的全部状态。
#[derive(Debug, Clone)]
pub struct DimensionState {
    selection: DimensionSelection,
    image: Option<ImageMeta>,
    preset_heights: PresetHeights,
    warning: WarningState,
}

impl DimensionState {
    pub fn new(registry: &PresetRegistry) -> Self {
        Self {
            selection: DimensionSelection::baseline(registry),
            image: None,
            preset_heights: PresetHeights::default(),
            warning: WarningState::cleared(),
        }
    }

    pub fn selection(&self) -> &DimensionSelection {
        &self.selection
    }

    pub fn image(&self) -> Option<&ImageMeta> {
        self.image.as_ref()
    }

    pub fn warning(&self) -> &WarningState {
        &self.warning
    }

    /// 当前图片下某个预设推导出的（未收敛）高度。
    pub fn preset_height(&self, key: &str) -> Option<u32> {
        self.preset_heights.get(key)
    }

    /// 宽高字段是否允许用户编辑。
    pub fn is_editable(&self) -> bool {
        self.selection.active_preset_key == crate::preset::CUSTOM_PRESET_KEY
    }

    /// 上传被拒绝：丢弃图片与缓存，回到基线（激活默认预设）。
    pub fn reset(&mut self, registry: &PresetRegistry) {
        if let Some(image) = self.image.take() {
            log::debug!("🧹 释放预览：{}（{} 字节）", image.display_name(), image.preview().len());
        }
        self.preset_heights.clear();
        self.selection = DimensionSelection::baseline(registry);
        self.warning = WarningState::cleared();
    }

    /// 接受新图片：为所有预设重新推导高度，再刷新当前选择。
    pub fn apply_image(&mut self, registry: &PresetRegistry, image: ImageMeta) {
        let (image_width, image_height) = (image.pixel_width(), image.pixel_height());
        self.preset_heights = PresetHeights::compute(registry, image_width, image_height);
        self.image = Some(image);

        let max_length = registry.max_length();
        let Some(preset) = registry.definition_for(&self.selection.active_preset_key).cloned() else {
            self.reset(registry);
            return;
        };

        if preset.is_custom() {
            if !self.selection.aspect_locked {
                log::debug!("📐 custom 未锁定宽高比，新图片不改动宽高");
                return;
            }
            // 高度由收敛后的宽度推导，不使用像素宽度
            let width = image_width.min(max_length);
            let computed = height_from_width(width, image_width, image_height);
            self.selection.width = width;
            self.apply_height(constrain(computed, max_length, Axis::Height, true));
        } else {
            self.show_preset(&preset, max_length);
        }

        log::info!(
            "📐 新图片尺寸推导完成 - {}x{} → 预设 {} 输出 {}x{}",
            image_width,
            image_height,
            self.selection.active_preset_key,
            self.selection.width,
            self.selection.height
        );
    }

    /// 切换预设。
    pub fn select_preset(&mut self, registry: &PresetRegistry, key: &str) -> Result<(), DimensionError> {
        let preset = registry
            .definition_for(key)
            .cloned()
            .ok_or_else(|| DimensionError::UnknownPreset(key.to_string()))?;
        let max_length = registry.max_length();

        self.selection.active_preset_key = preset.key.clone();

        if preset.is_custom() {
            // 沿用当前字段值，只重新收敛高度
            let locked = self.selection.aspect_locked;
            self.apply_height(constrain(self.selection.height, max_length, Axis::Height, locked));
        } else {
            self.selection.aspect_locked = true;
            self.show_preset(&preset, max_length);
        }

        log::debug!(
            "🔀 切换预设 {} → {}x{}（locked={}）",
            key,
            self.selection.width,
            self.selection.height,
            self.selection.aspect_locked
        );
        Ok(())
    }

    /// 切换宽高比锁，仅 `custom` 可用。开启时按当前宽度重新推导高度。
    pub fn set_aspect_lock(&mut self, registry: &PresetRegistry, locked: bool) -> Result<(), DimensionError> {
        if !self.is_editable() {
            if locked {
                return Ok(());
            }
            return Err(DimensionError::AspectLockForced(self.selection.active_preset_key.clone()));
        }

        self.selection.aspect_locked = locked;
        if !locked {
            self.warning = WarningState::cleared();
            return Ok(());
        }

        if let Some((image_width, image_height)) = self.image_dimensions() {
            let computed = height_from_width(self.selection.width, image_width, image_height);
            self.apply_height(constrain(computed, registry.max_length(), Axis::Height, true));
        }
        Ok(())
    }

    /// 用户编辑宽度（原始输入）。
    pub fn edit_width(&mut self, registry: &PresetRegistry, raw: i64) -> Result<(), DimensionError> {
        self.ensure_editable()?;
        let max_length = registry.max_length();
        let width = sanitize_field_input(raw, max_length);
        self.selection.width = width;

        match self.locked_image_dimensions() {
            Some((image_width, image_height)) => {
                let computed = height_from_width(width, image_width, image_height);
                self.apply_height(constrain(computed, max_length, Axis::Height, true));
            }
            None => self.warning = WarningState::cleared(),
        }
        Ok(())
    }

    /// 用户编辑高度（原始输入）。
    pub fn edit_height(&mut self, registry: &PresetRegistry, raw: i64) -> Result<(), DimensionError> {
        self.ensure_editable()?;
        let max_length = registry.max_length();
        let height = sanitize_field_input(raw, max_length);
        self.selection.height = height;

        match self.locked_image_dimensions() {
            Some((image_width, image_height)) => {
                let computed = width_from_height(height, image_width, image_height);
                let constrained = constrain(computed, max_length, Axis::Width, true);
                self.selection.width = constrained.value;
                self.warning = constrained.warning;
            }
            None => self.warning = WarningState::cleared(),
        }
        Ok(())
    }

    fn show_preset(&mut self, preset: &PresetDefinition, max_length: u32) {
        let width = preset.fixed_width.unwrap_or(DEFAULT_CUSTOM_WIDTH).min(max_length);
        let computed = self
            .preset_heights
            .get(&preset.key)
            .unwrap_or_else(|| height_from_width(width, 1, 1));

        self.selection.width = width;
        self.apply_height(constrain(computed, preset.height_bound(max_length), Axis::Height, true));
    }

    fn apply_height(&mut self, constrained: Constrained) {
        self.selection.height = constrained.value;
        self.warning = constrained.warning;
    }

    fn ensure_editable(&self) -> Result<(), DimensionError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(DimensionError::ReadOnly(self.selection.active_preset_key.clone()))
        }
    }

    fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image
            .as_ref()
            .map(|image| (image.pixel_width(), image.pixel_height()))
    }

    fn locked_image_dimensions(&self) -> Option<(u32, u32)> {
        if self.selection.aspect_locked {
            self.image_dimensions()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{builtin_presets, PresetRegistry, CUSTOM_PRESET_KEY};
    use crate::upload::PreviewHandle;
    use bytes::Bytes;
    use proptest::prelude::*;

    fn image(width: u32, height: u32) -> ImageMeta {
        ImageMeta::new(width, height, "photo.png", PreviewHandle::new(Bytes::from_static(b"png")))
            .expect("valid image meta")
    }

    fn custom_state(registry: &PresetRegistry, img: ImageMeta) -> DimensionState {
        let mut state = DimensionState::new(registry);
        state.apply_image(registry, img);
        state.select_preset(registry, CUSTOM_PRESET_KEY).expect("custom exists");
        state
    }

    #[test]
    fn baseline_uses_default_preset() {
        let registry = PresetRegistry::builtin();
        let state = DimensionState::new(&registry);

        let selection = state.selection();
        assert_eq!(selection.active_preset_key, "small");
        assert_eq!(selection.width, 30);
        assert_eq!(selection.height, 15);
        assert!(selection.aspect_locked);
        assert!(state.image().is_none());
        assert!(!state.is_editable());
    }

    #[test]
    fn new_image_resolves_active_preset() {
        let registry = PresetRegistry::builtin();
        let mut state = DimensionState::new(&registry);
        state.apply_image(&registry, image(800, 400));

        assert_eq!(state.selection().width, 30);
        assert_eq!(state.selection().height, 8);
        assert!(!state.warning().is_active());
        assert_eq!(state.preset_height("large"), Some(30));
    }

    #[test]
    fn preset_wider_than_max_length_keeps_aspect_ratio() {
        let registry = PresetRegistry::new(builtin_presets(), "small", 100).expect("valid registry");
        let mut state = DimensionState::new(&registry);
        state.apply_image(&registry, image(200, 200));
        state.select_preset(&registry, "large").expect("large exists");

        // large 的 120 被收敛到 100：100 * 200 / 200 / 2 = 50
        assert_eq!(state.selection().width, 100);
        assert_eq!(state.selection().height, 50);
        assert!(!state.warning().is_active());
        assert_eq!(state.preset_height("large"), Some(50));
    }

    #[test]
    fn twitch_preset_clamps_tall_image_with_warning() {
        let registry = PresetRegistry::builtin();
        let mut state = DimensionState::new(&registry);
        // 30 * 1000 / 500 / 2 = 30 > 15
        state.apply_image(&registry, image(500, 1000));
        state.select_preset(&registry, "twitch").expect("twitch exists");

        assert_eq!(state.selection().width, 30);
        assert_eq!(state.selection().height, 15);
        assert!(state.warning().is_active());
        assert_eq!(
            state.warning().message(),
            "Aspect Ratio cannot be maintained. Height cannot exceed 15."
        );

        state.select_preset(&registry, "medium").expect("medium exists");
        assert_eq!(state.selection().height, 60);
        assert!(!state.warning().is_active());
    }

    #[test]
    fn preset_fields_are_read_only() {
        let registry = PresetRegistry::builtin();
        let mut state = DimensionState::new(&registry);
        state.apply_image(&registry, image(800, 400));

        assert_eq!(
            state.edit_width(&registry, 99),
            Err(DimensionError::ReadOnly("small".to_string()))
        );
        assert_eq!(
            state.edit_height(&registry, 99),
            Err(DimensionError::ReadOnly("small".to_string()))
        );
        assert_eq!(state.selection().width, 30);
    }

    #[test]
    fn preset_forces_aspect_lock() {
        let registry = PresetRegistry::builtin();
        let mut state = DimensionState::new(&registry);

        assert!(matches!(
            state.set_aspect_lock(&registry, false),
            Err(DimensionError::AspectLockForced(_))
        ));

        let mut state = custom_state(&registry, image(800, 400));
        state.set_aspect_lock(&registry, false).expect("custom allows unlocking");
        state.select_preset(&registry, "large").expect("large exists");
        assert!(state.selection().aspect_locked);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let registry = PresetRegistry::builtin();
        let mut state = DimensionState::new(&registry);
        assert_eq!(
            state.select_preset(&registry, "poster"),
            Err(DimensionError::UnknownPreset("poster".to_string()))
        );
        assert_eq!(state.selection().active_preset_key, "small");
    }

    #[test]
    fn locked_width_edit_recomputes_height() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));

        state.edit_width(&registry, 100).expect("custom is editable");
        assert_eq!(state.selection().width, 100);
        assert_eq!(state.selection().height, 25);
        assert!(!state.warning().is_active());
    }

    #[test]
    fn locked_height_edit_recomputes_width_and_warns_on_overflow() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));

        state.edit_height(&registry, 100).expect("custom is editable");
        assert_eq!(state.selection().height, 100);
        assert_eq!(state.selection().width, 400);
        assert!(!state.warning().is_active());

        // 300 * 800 / 400 = 600 → 1200 > 500
        state.edit_height(&registry, 300).expect("custom is editable");
        assert_eq!(state.selection().width, 500);
        assert!(state.warning().is_active());
        assert_eq!(
            state.warning().message(),
            "Aspect Ratio cannot be maintained. Width cannot exceed 500."
        );
    }

    #[test]
    fn unlocked_edits_are_independent() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));
        state.set_aspect_lock(&registry, false).expect("custom allows unlocking");

        state.edit_width(&registry, 120).expect("editable");
        state.edit_height(&registry, 7).expect("editable");

        assert_eq!(state.selection().width, 120);
        assert_eq!(state.selection().height, 7);
        assert!(!state.warning().is_active());
    }

    #[test]
    fn raw_inputs_are_clamped_before_derivation() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(1000, 1000));

        state.edit_width(&registry, -5).expect("editable");
        assert_eq!(state.selection().width, 1);
        assert_eq!(state.selection().height, 1);

        state.edit_width(&registry, 10_000).expect("editable");
        assert_eq!(state.selection().width, 500);
        assert_eq!(state.selection().height, 250);
    }

    #[test]
    fn relocking_recomputes_height_from_width() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));
        state.set_aspect_lock(&registry, false).expect("unlock");
        state.edit_width(&registry, 200).expect("editable");
        state.edit_height(&registry, 3).expect("editable");

        state.set_aspect_lock(&registry, true).expect("relock");
        assert_eq!(state.selection().height, 50);
    }

    #[test]
    fn custom_locked_new_image_uses_clamped_pixel_width() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));

        state.apply_image(&registry, image(320, 320));
        assert_eq!(state.selection().width, 320);
        assert_eq!(state.selection().height, 160);

        // 2000 宽收敛到 500，高度 500 * 6000 / 2000 / 2 = 750 > 500
        state.apply_image(&registry, image(2000, 6000));
        assert_eq!(state.selection().width, 500);
        assert_eq!(state.selection().height, 500);
        assert!(state.warning().is_active());

        // 1000 宽收敛到 500，高度 500 * 400 / 1000 / 2 = 100（而不是 200）
        state.apply_image(&registry, image(1000, 400));
        assert_eq!((state.selection().width, state.selection().height), (500, 100));
        assert!(!state.warning().is_active());
    }

    #[test]
    fn custom_unlocked_new_image_keeps_fields() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));
        state.set_aspect_lock(&registry, false).expect("unlock");
        state.edit_width(&registry, 77).expect("editable");
        state.edit_height(&registry, 11).expect("editable");

        state.apply_image(&registry, image(1920, 1080));
        assert_eq!(state.selection().width, 77);
        assert_eq!(state.selection().height, 11);
        assert_eq!(state.image().map(ImageMeta::pixel_width), Some(1920));
    }

    #[test]
    fn reset_restores_default_preset_and_drops_image() {
        let registry = PresetRegistry::builtin();
        let mut state = custom_state(&registry, image(800, 400));
        state.edit_width(&registry, 250).expect("editable");

        state.reset(&registry);
        assert_eq!(state.selection().active_preset_key, "small");
        assert!(state.image().is_none());
        assert!(state.preset_height("small").is_none());
        assert!(!state.warning().is_active());
    }

    proptest! {
        #[test]
        fn dimensions_stay_within_bounds_for_any_edit_sequence(
            image_width in 1u32..=6000,
            image_height in 1u32..=6000,
            edits in proptest::collection::vec((any::<bool>(), -1_000i64..=2_000), 1..20),
        ) {
            let registry = PresetRegistry::builtin();
            let mut state = custom_state(&registry, image(image_width, image_height));

            for (edit_width, raw) in edits {
                if edit_width {
                    state.edit_width(&registry, raw).expect("editable");
                } else {
                    state.edit_height(&registry, raw).expect("editable");
                }

                let selection = state.selection();
                prop_assert!((1..=500).contains(&selection.width));
                prop_assert!((1..=500).contains(&selection.height));
                if state.warning().is_active() {
                    prop_assert!(selection.aspect_locked);
                }
            }
        }

        #[test]
        fn preset_height_never_exceeds_preset_bound(
            image_width in 1u32..=6000,
            image_height in 1u32..=6000,
            preset_index in 0usize..5,
        ) {
            let registry = PresetRegistry::builtin();
            let key = registry.all_keys()[preset_index].to_string();
            let mut state = DimensionState::new(&registry);
            state.apply_image(&registry, image(image_width, image_height));
            state.select_preset(&registry, &key).expect("preset exists");

            let preset = registry.definition_for(&key).expect("preset exists");
            let fixed_width = preset.fixed_width.expect("fixed preset");
            let natural = height_from_width(fixed_width, image_width, image_height);

            prop_assert!(state.selection().height <= preset.height_bound(500));
            prop_assert_eq!(state.selection().height, natural.min(preset.height_bound(500)));
        }
    }
}
