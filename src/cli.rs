// ============================================================================
// asciify CLI：无界面命令行前端
// ============================================================================
//
// 用法示例：
//   asciify photo.png                          （默认预设 small）
//   asciify photo.jpg --preset discord --copy
//   asciify photo.png --width 80               （custom + 锁定宽高比）
//   asciify photo.png -W 80 -H 20              （同时给出宽高时自动解除锁定）
//   asciify photo.png --style contrast --invert --brightness 65
//
// CLI 只是 `Workbench` 的另一种事件来源：参数被翻译为与界面相同的 UiEvent 序列。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::clipboard::SystemClipboard;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::preset::CUSTOM_PRESET_KEY;
use crate::settings::{default_config_path, Theme, ThemeStore};
use crate::submission::{ConversionOptions, HttpConversionClient, RequestError, SubmissionState};
use crate::upload::read_selected_file;
use crate::workbench::{UiEvent, Workbench};

// ============================================================================
// 参数定义（clap Derive）
// ============================================================================

/// asciify：把 JPEG / PNG 图片转换为字符画。
#[derive(Parser, Debug)]
#[command(
    name = "asciify",
    version,
    about = "Convert a JPEG or PNG image into character art",
    long_about = "Upload an image to the conversion service and print the resulting\n\
                  character grid. Output size comes from a named preset or from a\n\
                  custom width/height; aspect ratio is kept unless --no-lock is given.\n\n\
                  Example:\n  \
                  asciify photo.png --preset discord --copy\n  \
                  asciify photo.jpg --width 80 --style contrast"
)]
pub struct CliArgs {
    /// Image to convert (JPEG or PNG).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Size preset: twitch, discord, small, medium, large, custom.
    #[arg(short, long, value_name = "KEY", conflicts_with_all = ["width", "height"])]
    pub preset: Option<String>,

    /// Custom output width in characters.
    #[arg(short = 'W', long, value_name = "N")]
    pub width: Option<u32>,

    /// Custom output height in characters.
    #[arg(short = 'H', long, value_name = "N")]
    pub height: Option<u32>,

    /// Do not keep the image aspect ratio (custom size only).
    #[arg(long)]
    pub no_lock: bool,

    /// Brightness adjustment (0-100, default from config).
    #[arg(short, long, value_name = "0-100")]
    pub brightness: Option<f64>,

    /// Character mapping style: normal, brightness, contrast.
    #[arg(short, long, default_value = "normal", value_name = "STYLE")]
    pub style: String,

    /// Invert the character ramp.
    #[arg(long)]
    pub invert: bool,

    /// Conversion service URL (overrides the config file).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Configuration file (JSON). Defaults to the user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Copy the result to the system clipboard.
    #[arg(long)]
    pub copy: bool,

    /// Theme sent to the service: light or dark. Defaults to the saved preference.
    #[arg(long, value_name = "light|dark")]
    pub theme: Option<String>,
}

// ============================================================================
// 入口
// ============================================================================

/// 执行一次转换并返回进程退出码。
/// `0` = 成功，`1` = 校验 / 请求 / 配置错误。
pub async fn run(args: CliArgs) -> ExitCode {
    match execute(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: &CliArgs) -> Result<(), AppError> {
    let config = load_config(args)?;
    let theme = resolve_theme(args.theme.as_deref())?;
    let limits = config.upload_limits();

    let client = HttpConversionClient::new(&config)?;
    let mut bench = Workbench::new(config, client, SystemClipboard::default(), theme)?;

    let file = read_selected_file(&args.image, &limits)?;
    bench.handle(UiEvent::FilesSelected(vec![file])).await?;
    bench.finish_upload().await?;

    for event in dimension_events(args, bench.registry().default_key()) {
        bench.handle(event).await?;
    }
    bench.handle(UiEvent::StyleChosen(args.style.clone())).await?;
    bench.handle(UiEvent::InvertToggled(args.invert)).await?;

    let selection = bench.selection();
    log::info!(
        "📐 输出尺寸 {}x{}（预设 {}，锁定={}）",
        selection.width,
        selection.height,
        selection.active_preset_key,
        selection.aspect_locked
    );
    if bench.warning().is_active() {
        eprintln!("warning: {}", bench.warning().message());
    }

    bench.handle(UiEvent::SubmitRequested).await?;
    if bench.settle_submission().await == Some(SubmissionState::Failed) {
        if let Some(error) = bench.submission_error() {
            return Err(error.clone().into());
        }
    }

    println!("{}", bench.output().transcript());

    if args.copy {
        bench.handle(UiEvent::OutputActivated).await?;
        if let Some(kind) = bench.acknowledgment() {
            eprintln!("{}", kind.message());
        }
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig, AppError> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => match default_config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("⚠️ 无法定位配置目录，使用默认配置：{}", e);
                None
            }
        },
    };

    let mut config = match path.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(brightness) = args.brightness {
        ConversionOptions::with_brightness(brightness)?;
        config.default_brightness = brightness;
    }

    config.validate()?;
    Ok(config)
}

fn resolve_theme(raw: Option<&str>) -> Result<Theme, AppError> {
    if let Some(raw) = raw {
        return Theme::parse(raw).ok_or_else(|| {
            RequestError::InvalidOption(format!("theme must be light or dark (got {:?})", raw)).into()
        });
    }

    let fallback = Theme::system_preference();
    Ok(match ThemeStore::at_default_location() {
        Ok(store) => store.load_or(fallback),
        Err(_) => fallback,
    })
}

/// 把尺寸相关参数翻译为 UI 事件序列。
///
/// 固定预设总是锁定宽高比，此时 `--no-lock` 只记录一条警告。
fn dimension_events(args: &CliArgs, default_key: &str) -> Vec<UiEvent> {
    let mut events = Vec::new();

    if args.preset.is_some() || (args.width.is_none() && args.height.is_none()) {
        let key = args.preset.as_deref().unwrap_or(default_key);
        if let Some(preset) = &args.preset {
            events.push(UiEvent::PresetChosen(preset.clone()));
        }
        if args.no_lock {
            if key == CUSTOM_PRESET_KEY {
                events.push(UiEvent::AspectLockToggled(false));
            } else {
                log::warn!("⚠️ 预设 {} 总是锁定宽高比，忽略 --no-lock", key);
            }
        }
        return events;
    }

    events.push(UiEvent::PresetChosen(CUSTOM_PRESET_KEY.to_string()));
    let both = args.width.is_some() && args.height.is_some();
    if args.no_lock || both {
        events.push(UiEvent::AspectLockToggled(false));
    }
    if let Some(width) = args.width {
        events.push(UiEvent::WidthEdited(width.to_string()));
    }
    if let Some(height) = args.height {
        events.push(UiEvent::HeightEdited(height.to_string()));
    }
    events
}
