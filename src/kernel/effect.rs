use std::path::PathBuf;

/// Side effects requested by the store, executed by the workbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadDir(PathBuf),
    LoadFile(PathBuf),
    WriteFile {
        path: PathBuf,
        content: String,
        version: u64,
    },
}
