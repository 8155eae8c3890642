//! # 字符画转换客户端：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 前端 / CLI（原始 UI 事件）                 │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ UiEvent
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  workbench ──── 事件适配 + 单线程顺序保证                  │
//! │    │                                                     │
//! │    ├─ upload ───────── 文件校验 · 签名识别 · 尺寸解码       │
//! │    ├─ dimension ────── 尺寸推导 · 上限收敛 · 警告          │
//! │    │    └─ preset      预设尺寸注册表（只读）               │
//! │    ├─ submission ───── Idle→Submitting→Succeeded/Failed    │
//! │    │    └─ client      multipart HTTP 转换服务             │
//! │    └─ clipboard ────── 复制字符画 + 短暂确认提示            │
//! │                                                          │
//! │  config / settings ─── JSON 配置与主题偏好持久化           │
//! │  error ─────────────── AppError（统一错误类型）            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`config`] | 应用配置（尺寸上限、预设表、服务地址、超时） |
//! | [`preset`] | 预设尺寸注册表，启动时构建一次 |
//! | [`dimension`] | 宽高推导、上限收敛与警告、选择状态 |
//! | [`upload`] | 文件选择校验与图片元信息解码 |
//! | [`submission`] | 提交状态机、请求负载、响应解析、HTTP 客户端 |
//! | [`clipboard`] | 剪贴板写入与确认提示计时 |
//! | [`settings`] | 主题偏好的读取与持久化 |
//! | [`workbench`] | 将原始 UI 事件翻译为各组件的类型化输入 |
//! | [`cli`] | 无界面命令行前端 |

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod dimension;
pub mod error;
pub mod preset;
pub mod settings;
pub mod submission;
pub mod upload;
pub mod workbench;
