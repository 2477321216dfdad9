use crate::models::{DirEntryInfo, NodeId};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the project root and start loading its top level.
    OpenRoot(PathBuf),
    /// Expand or collapse a directory row.
    ToggleDir(NodeId),
    /// A directory listing arrived from the filesystem.
    DirLoaded {
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    /// A directory listing failed; the node shows the message inline.
    DirLoadError { path: PathBuf, message: String },
    /// File content arrived; open (or re-focus) its tab.
    OpenFile { path: PathBuf, content: String },
    /// Replace a tab's buffer content.
    Edit { index: usize, content: String },
    /// Focus another open tab.
    SwitchTab { index: usize },
    /// Ask for the tab's current content to be written out.
    RequestSave { index: usize },
    /// A write completed; `content` is what landed on disk.
    Saved {
        path: PathBuf,
        version: u64,
        content: String,
    },
    /// Remove a tab. Unsaved-changes policy is decided before dispatch.
    CloseTab { index: usize },
    /// An entry was renamed on disk; update the tree and any open tabs.
    EntryRenamed { from: PathBuf, to: PathBuf },
    /// An entry was deleted on disk; drop its subtree and close its tabs.
    EntryDeleted { path: PathBuf },
}
