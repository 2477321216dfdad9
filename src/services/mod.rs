//! 服务层模块
//!
//! - file: 文件系统服务（Provider 抽象 + 本地实现）
//! - path: 路径辅助函数
//! - config: 应用设置

pub mod config;
pub mod file;
pub mod path;

pub use config::Settings;
pub use file::{DirEntry, FileError, FileMetadata, FileProvider, LocalFileProvider};
