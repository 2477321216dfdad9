//! 应用核心状态：资源管理器 + 编辑器会话

use crate::kernel::{EditorState, Effect};
use crate::models::{DirEntryInfo, FileTree, FileTreeRow, LoadState, NodeId};
use crate::services::config::Settings;
use std::path::{Path, PathBuf};

pub struct ExplorerState {
    tree: Option<FileTree>,
    pub rows: Vec<FileTreeRow>,
    /// The default-file heuristic fires at most once per root.
    default_file_opened: bool,
}

impl std::fmt::Debug for ExplorerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerState")
            .field("rows_len", &self.rows.len())
            .field("root", &self.tree.as_ref().map(|t| t.absolute_root()))
            .finish()
    }
}

impl ExplorerState {
    pub fn new() -> Self {
        Self {
            tree: None,
            rows: Vec::new(),
            default_file_opened: false,
        }
    }

    pub fn root_path(&self) -> Option<&Path> {
        self.tree.as_ref().map(|t| t.absolute_root())
    }

    pub fn tree(&self) -> Option<&FileTree> {
        self.tree.as_ref()
    }

    /// Rebuilds the tree for a new root and starts loading its top level.
    /// `extra_visible` is the configured addition to the hidden-name
    /// allow-list.
    pub fn open_root(&mut self, path: PathBuf, extra_visible: &[String]) -> Vec<Effect> {
        let mut tree = FileTree::new_with_root(path.clone());
        tree.set_extra_visible(extra_visible.iter().map(|s| s.as_str().into()).collect());
        let root = tree.root();
        tree.set_load_state(root, LoadState::Loading);
        self.tree = Some(tree);
        self.default_file_opened = false;
        self.refresh_rows();
        vec![Effect::LoadDir(path)]
    }

    pub fn toggle_dir(&mut self, id: NodeId) -> (bool, Vec<Effect>) {
        let Some(tree) = self.tree.as_mut() else {
            return (false, Vec::new());
        };
        if !tree.is_dir(id) {
            return (false, Vec::new());
        }

        if tree.is_expanded(id) {
            tree.collapse(id);
            self.refresh_rows();
            return (true, Vec::new());
        }

        match tree.load_state(id) {
            Some(LoadState::NotLoaded) | Some(LoadState::Failed) => {
                tree.set_load_state(id, LoadState::Loading);
                tree.expand(id);
                let path = tree.full_path(id);
                self.refresh_rows();
                (true, vec![Effect::LoadDir(path)])
            }
            // a load is already in flight; expanding again must not
            // duplicate it
            Some(LoadState::Loading) => {
                tree.expand(id);
                self.refresh_rows();
                (true, Vec::new())
            }
            Some(LoadState::Loaded) => {
                tree.expand(id);
                self.refresh_rows();
                (true, Vec::new())
            }
            None => (false, Vec::new()),
        }
    }

    /// Materializes a listing. Returns the default file to open when the
    /// freshly loaded root contains it (once per root).
    pub fn apply_dir_loaded(
        &mut self,
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
        default_file_name: &str,
    ) -> (bool, Option<PathBuf>) {
        let Some(tree) = self.tree.as_mut() else {
            return (false, None);
        };
        let Some(node_id) = tree.find_node_by_path(&path) else {
            return (false, None);
        };

        if tree.materialize(node_id, entries).is_err() {
            return (false, None);
        }

        let mut default_open = None;
        if node_id == tree.root() && !self.default_file_opened {
            let has_default = tree
                .children(node_id)
                .map(|children| children.to_vec())
                .unwrap_or_default()
                .into_iter()
                .any(|child| {
                    !tree.is_dir(child) && tree.get_name(child) == Some(default_file_name)
                });
            if has_default {
                self.default_file_opened = true;
                default_open = Some(path.join(default_file_name));
            }
        }

        self.refresh_rows();
        (true, default_open)
    }

    pub fn apply_dir_load_error(&mut self, path: PathBuf, message: String) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(node_id) = tree.find_node_by_path(&path) else {
            return false;
        };

        tree.set_load_error(node_id, message.into());
        self.refresh_rows();
        true
    }

    /// Marks the node for `path` active and makes it visible, tolerating
    /// platform separator differences.
    pub fn highlight(&mut self, path: &Path) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };

        match tree.find_best_match(path) {
            Some(id) => {
                tree.expand_ancestors(id);
                tree.set_active(Some(id));
            }
            None => tree.set_active(None),
        }
        self.refresh_rows();
        true
    }

    /// Applies a completed on-disk rename to the tree.
    pub fn apply_rename(&mut self, from: &Path, to: &Path) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(id) = tree.find_node_by_path(from) else {
            return false;
        };
        let Some(new_name) = to.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if let Err(e) = tree.rename_node(id, &new_name) {
            tracing::warn!(from = %from.display(), to = %to.display(), error = %e, "tree rename skipped");
            return false;
        }
        self.refresh_rows();
        true
    }

    /// Drops the subtree for an entry deleted on disk.
    pub fn apply_delete(&mut self, path: &Path) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(id) = tree.find_node_by_path(path) else {
            return false;
        };
        if let Err(e) = tree.remove_node(id) {
            tracing::warn!(path = %path.display(), error = %e, "tree delete skipped");
            return false;
        }
        self.refresh_rows();
        true
    }

    pub fn clear_highlight(&mut self) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        if tree.active().is_none() {
            return false;
        }
        tree.set_active(None);
        self.refresh_rows();
        true
    }

    fn refresh_rows(&mut self) {
        self.rows = self
            .tree
            .as_ref()
            .map(|t| t.flatten_for_view())
            .unwrap_or_default();
    }
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct AppState {
    pub explorer: ExplorerState,
    pub editor: EditorState,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            explorer: ExplorerState::new(),
            editor: EditorState::new(),
            settings,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
