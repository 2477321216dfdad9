//! acode - headless core for a desktop code-editor shell
//!
//! 模块结构：
//! - models: 数据模型（FileTree, Language）
//! - kernel: 应用核心（State, Action, Effect, Store）
//! - services: 服务层（FileProvider, path helpers, Settings）
//! - app: 应用层（Workbench）

pub mod app;
pub mod kernel;
pub mod logging;
pub mod models;
pub mod services;

pub const APP_NAME: &str = "acode";
