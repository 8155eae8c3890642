//! # UI 事件
//!
//! 表单字段以原始字符串到达，这里负责把它们转换为类型化输入；
//! 无法解析为数值的输入直接忽略，字段保持原值。

use crate::upload::{FileSelection, SelectedFile};

/// 原始 UI 事件。
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// 文件选择器返回的文件（可能为空）。
    FilesSelected(Vec<SelectedFile>),
    /// 拖放到上传区域的文件。
    FilesDropped(Vec<SelectedFile>),
    PresetChosen(String),
    AspectLockToggled(bool),
    WidthEdited(String),
    HeightEdited(String),
    BrightnessEdited(String),
    StyleChosen(String),
    InvertToggled(bool),
    SubmitRequested,
    /// 点击输出区域（复制字符画）。
    OutputActivated,
    ThemeToggled,
}

impl UiEvent {
    /// 上传类事件转换为 `FileSelection`。
    pub(super) fn into_selection(self) -> Result<FileSelection, Self> {
        match self {
            Self::FilesSelected(files) => Ok(FileSelection::picked(files)),
            Self::FilesDropped(files) => Ok(FileSelection::dropped(files)),
            other => Err(other),
        }
    }
}

/// 宽高输入：接受整数或小数（四舍五入），其余忽略。
pub fn parse_dimension_input(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?;
    Some(value.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
}

/// 亮度滑块输入。
pub fn parse_brightness_input(raw: &str) -> Option<f64> {
    parse_number(raw)
}

fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_input_rounds_and_ignores_junk() {
        assert_eq!(parse_dimension_input("42"), Some(42));
        assert_eq!(parse_dimension_input(" 12.6 "), Some(13));
        assert_eq!(parse_dimension_input("-7"), Some(-7));
        assert_eq!(parse_dimension_input(""), None);
        assert_eq!(parse_dimension_input("abc"), None);
        assert_eq!(parse_dimension_input("inf"), None);
        assert_eq!(parse_dimension_input("NaN"), None);
    }

    #[test]
    fn brightness_input_accepts_decimals() {
        assert_eq!(parse_brightness_input("37.5"), Some(37.5));
        assert_eq!(parse_brightness_input("bright"), None);
    }

    #[test]
    fn only_upload_events_become_selections() {
        assert!(UiEvent::FilesDropped(Vec::new()).into_selection().is_ok());
        assert!(UiEvent::SubmitRequested.into_selection().is_err());
    }
}
