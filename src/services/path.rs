//! 路径辅助函数（纯函数，无 IO）

use std::path::Path;

/// File name shown on tabs and in the window title.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Last component of the project root, shown in the window title.
pub fn project_folder_name(root: &Path) -> String {
    root.file_name()
        .or_else(|| root.iter().next_back())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string())
}
