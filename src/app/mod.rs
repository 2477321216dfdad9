//! 应用层：Workbench 把内核、文件服务和外部对话框接在一起

pub mod workbench;

pub use workbench::{Notification, SaveChoice, SavePrompt, Severity, Workbench};
