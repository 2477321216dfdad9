//! 数据模型层

pub mod file_tree;
pub mod language;

pub use file_tree::{
    normalize_separators, should_list, should_list_with, DirEntryInfo, FileTree, FileTreeError,
    FileTreeRow, LoadState, NodeId, NodeKind,
};
pub use language::LanguageId;
