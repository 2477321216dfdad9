//! 文件服务模块
//!
//! 提供文件系统抽象，方便替换后端

pub mod local;
pub mod provider;

pub use local::LocalFileProvider;
pub use provider::{DirEntry, FileError, FileMetadata, FileProvider};
