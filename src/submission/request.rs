//! # 请求负载
//!
//! 负载字段：`image`、`width`、`height`、`brightness`、`style`、`invert`、`theme`。
//! 激活的预设键只用于本地推导尺寸，不会出现在负载中。

use std::str::FromStr;

use bytes::Bytes;

use crate::config::DEFAULT_BRIGHTNESS;
use crate::dimension::DimensionSelection;
use crate::settings::Theme;
use crate::upload::{AcceptedFile, MediaType};

use super::RequestError;

/// 字符映射风格。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversionStyle {
    #[default]
    Normal,
    Brightness,
    Contrast,
}

impl ConversionStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
        }
    }
}

impl FromStr for ConversionStyle {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            other => Err(RequestError::InvalidOption(format!(
                "style must be one of normal, brightness, contrast (got {:?})",
                other
            ))),
        }
    }
}

/// 转换选项（亮度 / 风格 / 反色）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    brightness: f64,
    pub style: ConversionStyle,
    pub invert: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            style: ConversionStyle::Normal,
            invert: false,
        }
    }
}

impl ConversionOptions {
    /// 以给定亮度构建选项；亮度必须在 `[0, 100]` 内。
    pub fn with_brightness(brightness: f64) -> Result<Self, RequestError> {
        let mut options = Self::default();
        options.set_brightness(brightness)?;
        Ok(options)
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// 严格设置亮度，越界返回错误（CLI 参数）。
    pub fn set_brightness(&mut self, brightness: f64) -> Result<(), RequestError> {
        if !brightness.is_finite() || !(0.0..=100.0).contains(&brightness) {
            return Err(RequestError::InvalidOption(format!(
                "brightness must be between 0 and 100 (got {})",
                brightness
            )));
        }
        self.brightness = brightness;
        Ok(())
    }

    /// 滑块输入：收敛到 `[0, 100]`，非数值忽略。
    pub fn set_brightness_clamped(&mut self, brightness: f64) {
        if brightness.is_nan() {
            return;
        }
        self.brightness = brightness.clamp(0.0, 100.0);
    }
}

/// 一次转换请求。
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub file_name: String,
    pub media_type: MediaType,
    pub image: Bytes,
    pub width: u32,
    pub height: u32,
    pub options: ConversionOptions,
    pub theme: Theme,
}

impl ConversionRequest {
    pub fn new(
        file: &AcceptedFile,
        selection: &DimensionSelection,
        options: ConversionOptions,
        theme: Theme,
    ) -> Self {
        Self {
            file_name: file.name.clone(),
            media_type: file.media_type,
            image: file.bytes.clone(),
            width: selection.width,
            height: selection.height,
            options,
            theme,
        }
    }

    /// 除图片外的表单字段，按发送顺序排列。
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("brightness", self.options.brightness().to_string()),
            ("style", self.options.style.as_str().to_string()),
        ];
        if self.options.invert {
            fields.push(("invert", "on".to_string()));
        }
        fields.push(("theme", self.theme.as_str().to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(options: ConversionOptions) -> ConversionRequest {
        let file = AcceptedFile {
            name: "cat.png".to_string(),
            media_type: MediaType::Png,
            bytes: Bytes::from_static(b"png"),
        };
        let selection = DimensionSelection {
            active_preset_key: "discord".to_string(),
            width: 32,
            height: 20,
            aspect_locked: true,
        };
        ConversionRequest::new(&file, &selection, options, Theme::Dark)
    }

    #[test]
    fn form_fields_never_carry_the_preset_key() {
        let fields = request(ConversionOptions::default()).form_fields();
        assert_eq!(
            fields,
            vec![
                ("width", "32".to_string()),
                ("height", "20".to_string()),
                ("brightness", "50".to_string()),
                ("style", "normal".to_string()),
                ("theme", "dark".to_string()),
            ]
        );
        assert!(fields.iter().all(|(_, value)| value != "discord"));
        assert!(fields.iter().all(|(name, _)| *name != "size"));
    }

    #[test]
    fn invert_is_sent_only_when_set() {
        let mut options = ConversionOptions::with_brightness(37.5).expect("valid brightness");
        options.style = ConversionStyle::Contrast;
        options.invert = true;

        let fields = request(options).form_fields();
        assert!(fields.contains(&("invert", "on".to_string())));
        assert!(fields.contains(&("brightness", "37.5".to_string())));
        assert!(fields.contains(&("style", "contrast".to_string())));
    }

    #[test]
    fn brightness_outside_range_is_rejected() {
        assert!(ConversionOptions::with_brightness(0.0).is_ok());
        assert!(ConversionOptions::with_brightness(100.0).is_ok());
        assert!(matches!(
            ConversionOptions::with_brightness(100.5),
            Err(RequestError::InvalidOption(_))
        ));
        assert!(ConversionOptions::with_brightness(-1.0).is_err());
        assert!(ConversionOptions::with_brightness(f64::NAN).is_err());
    }

    #[test]
    fn slider_brightness_is_clamped() {
        let mut options = ConversionOptions::default();
        options.set_brightness_clamped(140.0);
        assert_eq!(options.brightness(), 100.0);
        options.set_brightness_clamped(-3.0);
        assert_eq!(options.brightness(), 0.0);
        options.set_brightness_clamped(f64::NAN);
        assert_eq!(options.brightness(), 0.0);
    }

    #[test]
    fn style_parses_case_insensitively() {
        assert_eq!("Brightness".parse::<ConversionStyle>(), Ok(ConversionStyle::Brightness));
        assert_eq!(" normal ".parse::<ConversionStyle>(), Ok(ConversionStyle::Normal));
        assert!("sepia".parse::<ConversionStyle>().is_err());
    }
}
