//! 文件树数据模型
//!
//! 懒加载目录树：节点存放在 slotmap arena 中，父子关系通过 NodeId 索引，
//! 完整路径按需计算并缓存。

use compact_str::{CompactString, ToCompactString};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::{
    fmt,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FileTreeError {
    ParentNotDirectory,
    InvalidNodeId,
    NameExists,
    CannotModifyRoot,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
            FileTreeError::NameExists => write!(f, "an entry with that name already exists"),
            FileTreeError::CannotModifyRoot => write!(f, "the project root cannot be modified"),
        }
    }
}

impl std::error::Error for FileTreeError {}

/// A raw directory listing entry, before filtering.
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: CompactString,
    pub is_dir: bool,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: CompactString,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
    load_state: LoadState,
    load_error: Option<CompactString>,
}

impl Node {
    fn new_file(name: CompactString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::File,
            name,
            parent,
            children: None,
            load_state: LoadState::Loaded,
            load_error: None,
        }
    }

    fn new_dir(name: CompactString, parent: Option<NodeId>, load_state: LoadState) -> Self {
        Self {
            kind: NodeKind::Dir,
            name,
            parent,
            children: Some(Vec::new()),
            load_state,
            load_error: None,
        }
    }
}

/// Hidden entries that stay visible, matched exactly or as a `name.`-prefix
/// (so `.env` also admits `.env.local`, `.env.production`, ...).
const VISIBLE_HIDDEN: &[&str] = &[
    ".gitignore",
    ".env",
    ".gitmodules",
    ".gitattributes",
    ".gitkeep",
    ".editorconfig",
    ".eslintrc",
    ".prettierrc",
    ".babelrc",
    ".npmrc",
    ".nvmrc",
];

/// Build and dependency directories that never show up in the tree.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".svelte-kit",
];

/// Listing filter shared by the tree and anything pre-filtering entries.
pub fn should_list(name: &str, is_dir: bool) -> bool {
    should_list_with(name, is_dir, &[])
}

/// Same filter with configured extra dot-entries admitted alongside the
/// built-in allow-list.
pub fn should_list_with(name: &str, is_dir: bool, extra_visible: &[CompactString]) -> bool {
    if is_dir && SKIP_DIRS.contains(&name) {
        return false;
    }
    if name.starts_with('.') {
        let admits = |allowed: &str| name == allowed || name.starts_with(&format!("{allowed}."));
        return VISIBLE_HIDDEN.iter().any(|allowed| admits(allowed))
            || extra_visible.iter().any(|extra| admits(extra.as_str()));
    }
    true
}

pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: FxHashSet<NodeId>,
    active: Option<NodeId>,
    absolute_root: PathBuf,
    extra_visible: Vec<CompactString>,
    path_cache: FxHashMap<NodeId, PathBuf>,
    id_by_path: FxHashMap<PathBuf, NodeId>,
}

impl FileTree {
    /// 创建以 `absolute_root` 为根的树，根节点深度 0、初始展开、子节点未加载。
    pub fn new_with_root(absolute_root: PathBuf) -> Self {
        let root_name = absolute_root
            .file_name()
            .or_else(|| absolute_root.iter().next_back())
            .map(|s| s.to_string_lossy().to_compact_string())
            .unwrap_or_else(|| CompactString::const_new("/"));

        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new_dir(root_name, None, LoadState::NotLoaded));

        let mut expanded = FxHashSet::default();
        expanded.insert(root);

        Self {
            arena,
            root,
            expanded,
            active: None,
            absolute_root,
            extra_visible: Vec::new(),
            path_cache: FxHashMap::default(),
            id_by_path: FxHashMap::default(),
        }
    }

    /// Extra dot-entries the listing filter keeps visible, on top of the
    /// built-in allow-list.
    pub fn set_extra_visible(&mut self, names: Vec<CompactString>) {
        self.extra_visible = names;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn set_active(&mut self, id: Option<NodeId>) {
        self.active = id;
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.arena.get(id).map(|n| n.load_state)
    }

    pub fn set_load_state(&mut self, id: NodeId, state: LoadState) {
        if let Some(node) = self.arena.get_mut(id) {
            node.load_state = state;
            if state != LoadState::Failed {
                node.load_error = None;
            }
        }
    }

    pub fn set_load_error(&mut self, id: NodeId, message: CompactString) {
        if let Some(node) = self.arena.get_mut(id) {
            node.load_state = LoadState::Failed;
            node.load_error = Some(message);
        }
    }

    pub fn load_error(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).and_then(|n| n.load_error.as_deref())
    }

    pub fn get_name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.name.as_str())
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .map(|n| n.kind == NodeKind::Dir)
            .unwrap_or(false)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: NodeId) {
        if self.arena.get(id).is_some_and(|n| n.kind == NodeKind::Dir) {
            self.expanded.insert(id);
        }
    }

    /// Collapsing keeps already-loaded children: re-expansion is instant.
    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.arena
            .get(id)
            .and_then(|n| n.children.as_deref())
    }

    /// 用一次原始目录列表填充目录节点的子节点。
    ///
    /// Filters hidden and build entries, then orders directories before
    /// files with each group case-insensitively sorted by name. The order
    /// is a strict total order: identical listings always materialize
    /// identically.
    pub fn materialize(
        &mut self,
        id: NodeId,
        entries: Vec<DirEntryInfo>,
    ) -> Result<(), FileTreeError> {
        {
            let node = self.arena.get(id).ok_or(FileTreeError::InvalidNodeId)?;
            if node.kind != NodeKind::Dir {
                return Err(FileTreeError::ParentNotDirectory);
            }
        }

        let mut filtered: Vec<DirEntryInfo> = entries
            .into_iter()
            .filter(|e| should_list_with(&e.name, e.is_dir, &self.extra_visible))
            .collect();
        filtered.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        });

        // Re-materializing replaces the previous children wholesale.
        if let Some(old) = self
            .arena
            .get_mut(id)
            .and_then(|n| n.children.replace(Vec::new()))
        {
            for child in old {
                self.remove_subtree(child);
            }
        }

        let mut children = Vec::with_capacity(filtered.len());
        for entry in filtered {
            let node = if entry.is_dir {
                Node::new_dir(entry.name, Some(id), LoadState::NotLoaded)
            } else {
                Node::new_file(entry.name, Some(id))
            };
            children.push(self.arena.insert(node));
        }

        let parent = self.arena.get_mut(id).ok_or(FileTreeError::InvalidNodeId)?;
        parent.children = Some(children);
        parent.load_state = LoadState::Loaded;
        parent.load_error = None;
        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            self.expanded.remove(&node_id);
            if self.active == Some(node_id) {
                self.active = None;
            }
            if let Some(path) = self.path_cache.remove(&node_id) {
                self.id_by_path.remove(&path);
            }
            if let Some(node) = self.arena.remove(node_id) {
                if let Some(children) = node.children {
                    stack.extend(children);
                }
            }
        }
    }

    /// Computes the absolute path without touching the caches.
    pub fn path_of(&self, id: NodeId) -> Option<PathBuf> {
        if id == self.root {
            return Some(self.absolute_root.clone());
        }
        self.arena.get(id)?;

        let mut components = Vec::new();
        let mut current = id;
        while let Some(node) = self.arena.get(current) {
            match node.parent {
                Some(parent) => {
                    components.push(node.name.clone());
                    current = parent;
                }
                None => break,
            }
        }

        let mut path = self.absolute_root.clone();
        for comp in components.iter().rev() {
            path.push(comp.as_str());
        }
        Some(path)
    }

    pub fn full_path(&mut self, id: NodeId) -> PathBuf {
        if id == self.root {
            self.id_by_path
                .insert(self.absolute_root.clone(), self.root);
            return self.absolute_root.clone();
        }

        if let Some(cached) = self.path_cache.get(&id) {
            return cached.clone();
        }

        let path = self
            .path_of(id)
            .unwrap_or_else(|| self.absolute_root.clone());
        self.path_cache.insert(id, path.clone());
        self.id_by_path.insert(path.clone(), id);
        path
    }

    /// Renames a node in place. The subtree's cached paths are dropped
    /// and the siblings re-sorted, since both depend on the name.
    pub fn rename_node(&mut self, id: NodeId, new_name: &str) -> Result<(), FileTreeError> {
        let node = self.arena.get(id).ok_or(FileTreeError::InvalidNodeId)?;
        let Some(parent) = node.parent else {
            return Err(FileTreeError::CannotModifyRoot);
        };
        if node.name.as_str() == new_name {
            return Ok(());
        }

        let conflict = self
            .arena
            .get(parent)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
            .iter()
            .any(|&sibling| {
                sibling != id
                    && self
                        .arena
                        .get(sibling)
                        .is_some_and(|n| n.name.as_str() == new_name)
            });
        if conflict {
            return Err(FileTreeError::NameExists);
        }

        self.invalidate_subtree_paths(id);
        if let Some(node) = self.arena.get_mut(id) {
            node.name = new_name.into();
        }
        self.resort_children(parent);
        Ok(())
    }

    /// Detaches a node from its parent and frees the whole subtree.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), FileTreeError> {
        let node = self.arena.get(id).ok_or(FileTreeError::InvalidNodeId)?;
        let Some(parent) = node.parent else {
            return Err(FileTreeError::CannotModifyRoot);
        };

        if let Some(children) = self.arena.get_mut(parent).and_then(|n| n.children.as_mut()) {
            children.retain(|&child| child != id);
        }
        self.remove_subtree(id);
        Ok(())
    }

    fn invalidate_subtree_paths(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(path) = self.path_cache.remove(&node_id) {
                self.id_by_path.remove(&path);
            }
            if let Some(node) = self.arena.get(node_id) {
                if let Some(children) = &node.children {
                    stack.extend(children.iter().copied());
                }
            }
        }
    }

    fn resort_children(&mut self, parent: NodeId) {
        let Some(mut children) = self.arena.get_mut(parent).and_then(|n| n.children.take())
        else {
            return;
        };
        children.sort_by(|&a, &b| {
            let na = &self.arena[a];
            let nb = &self.arena[b];
            (nb.kind == NodeKind::Dir)
                .cmp(&(na.kind == NodeKind::Dir))
                .then_with(|| na.name.to_lowercase().cmp(&nb.name.to_lowercase()))
                .then_with(|| na.name.cmp(&nb.name))
        });
        if let Some(node) = self.arena.get_mut(parent) {
            node.children = Some(children);
        }
    }

    /// Exact lookup: walks tree components relative to the root.
    pub fn find_node_by_path(&mut self, path: &Path) -> Option<NodeId> {
        if path == self.absolute_root {
            return Some(self.root);
        }

        if let Some(id) = self.id_by_path.get(path).copied() {
            return Some(id);
        }

        let relative = path.strip_prefix(&self.absolute_root).ok()?;
        let mut current = self.root;

        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            let children = self.arena.get(current)?.children.as_ref()?;
            current = *children.iter().find(|&&child| {
                self.arena
                    .get(child)
                    .is_some_and(|n| n.name.as_str() == name)
            })?;
        }

        self.path_cache.insert(current, path.to_path_buf());
        self.id_by_path.insert(path.to_path_buf(), current);
        Some(current)
    }

    /// Lookup tolerant of platform separator mismatches: exact match after
    /// `\` -> `/` normalization, then a suffix match over materialized
    /// nodes (the queried path may carry a longer prefix than the tree's
    /// root spelling).
    pub fn find_best_match(&mut self, path: &Path) -> Option<NodeId> {
        if let Some(id) = self.find_node_by_path(path) {
            return Some(id);
        }

        let needle = normalize_separators(&path.to_string_lossy());

        let ids: Vec<NodeId> = self.arena.keys().collect();
        for id in ids {
            let candidate = normalize_separators(&self.full_path(id).to_string_lossy());
            if candidate == needle || needle.ends_with(&candidate) {
                return Some(id);
            }
        }
        None
    }

    /// Expands every ancestor directory of `id` so the node is visible.
    pub fn expand_ancestors(&mut self, id: NodeId) {
        let mut current = self.arena.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            self.expanded.insert(parent);
            current = self.arena.get(parent).and_then(|n| n.parent);
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: CompactString,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub is_active: bool,
    pub load_state: LoadState,
    pub load_error: Option<CompactString>,
}

impl FileTree {
    /// Flattens the visible portion of the tree, root first, children of
    /// expanded directories in materialized order.
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };

            result.push(FileTreeRow {
                id,
                depth,
                name: node.name.clone(),
                is_dir: node.kind == NodeKind::Dir,
                is_expanded: self.expanded.contains(&id),
                is_active: self.active == Some(id),
                load_state: node.load_state,
                load_error: node.load_error.clone(),
            });

            if self.expanded.contains(&id) {
                if let Some(children) = &node.children {
                    for &child in children.iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool) -> DirEntryInfo {
        DirEntryInfo {
            name: name.into(),
            is_dir,
        }
    }

    #[test]
    fn test_new_tree() {
        let tree = FileTree::new_with_root(PathBuf::from("/project"));
        assert!(tree.is_dir(tree.root()));
        assert!(tree.is_expanded(tree.root()));
        assert_eq!(tree.load_state(tree.root()), Some(LoadState::NotLoaded));
        assert_eq!(tree.get_name(tree.root()), Some("project"));
    }

    #[test]
    fn test_materialize_sorts_dirs_before_files_case_insensitive() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();

        tree.materialize(
            root,
            vec![
                entry("b.txt", false),
                entry("A", true),
                entry("a.txt", false),
                entry("B", true),
            ],
        )
        .unwrap();

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B", "a.txt", "b.txt"]);
        assert_eq!(tree.load_state(root), Some(LoadState::Loaded));
    }

    #[test]
    fn test_materialize_filters_hidden_except_allow_list() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();

        tree.materialize(
            root,
            vec![
                entry(".secret", false),
                entry(".gitignore", false),
                entry(".env.local", false),
                entry("normal.txt", false),
            ],
        )
        .unwrap();

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec![".env.local", ".gitignore", "normal.txt"]);
    }

    #[test]
    fn test_materialize_skips_build_dirs() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();

        tree.materialize(
            root,
            vec![
                entry("node_modules", true),
                entry("dist", true),
                entry("src", true),
                // a file named like a build dir is not filtered
                entry("build", false),
            ],
        )
        .unwrap();

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["src", "build"]);
    }

    #[test]
    fn test_collapse_keeps_children() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("sub", true)]).unwrap();
        let sub = tree.children(root).unwrap()[0];
        tree.materialize(sub, vec![entry("inner.txt", false)])
            .unwrap();

        tree.collapse(sub);
        assert!(!tree.is_expanded(sub));
        assert_eq!(tree.children(sub).unwrap().len(), 1);
        assert_eq!(tree.load_state(sub), Some(LoadState::Loaded));
    }

    #[test]
    fn test_full_path_and_exact_lookup() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("src", true)]).unwrap();
        let src = tree.children(root).unwrap()[0];
        tree.materialize(src, vec![entry("main.rs", false)])
            .unwrap();
        let main = tree.children(src).unwrap()[0];

        assert_eq!(tree.full_path(main), PathBuf::from("/project/src/main.rs"));
        assert_eq!(
            tree.find_node_by_path(Path::new("/project/src/main.rs")),
            Some(main)
        );
        assert_eq!(tree.find_node_by_path(Path::new("/project/missing")), None);
    }

    #[test]
    fn test_find_best_match_across_separators() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("src", true)]).unwrap();
        let src = tree.children(root).unwrap()[0];
        tree.materialize(src, vec![entry("main.rs", false)])
            .unwrap();
        let main = tree.children(src).unwrap()[0];

        let windows_spelling = Path::new("\\project\\src\\main.rs");
        assert_eq!(tree.find_best_match(windows_spelling), Some(main));
    }

    #[test]
    fn test_expand_ancestors() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("a", true)]).unwrap();
        let a = tree.children(root).unwrap()[0];
        tree.materialize(a, vec![entry("b", true)]).unwrap();
        let b = tree.children(a).unwrap()[0];
        tree.materialize(b, vec![entry("deep.txt", false)]).unwrap();
        let deep = tree.children(b).unwrap()[0];

        tree.collapse(a);
        tree.collapse(b);
        tree.expand_ancestors(deep);
        assert!(tree.is_expanded(a));
        assert!(tree.is_expanded(b));
    }

    #[test]
    fn test_flatten_for_view_depths() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("file1.txt", false), entry("sub", true)])
            .unwrap();
        let sub = tree.children(root).unwrap()[0];
        tree.materialize(sub, vec![entry("file2.txt", false)])
            .unwrap();

        // sub collapsed: root + two children
        let rows = tree.flatten_for_view();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].depth, 0);
        assert!(rows[1].is_dir);
        assert_eq!(rows[1].depth, 1);

        tree.expand(sub);
        let rows = tree.flatten_for_view();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].name, "file2.txt");
        assert_eq!(rows[2].depth, 2);
    }

    #[test]
    fn test_load_error_state() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("gone", true)]).unwrap();
        let gone = tree.children(root).unwrap()[0];

        tree.set_load_error(gone, "permission denied".into());
        assert_eq!(tree.load_state(gone), Some(LoadState::Failed));
        assert_eq!(tree.load_error(gone), Some("permission denied"));

        tree.set_load_state(gone, LoadState::Loading);
        assert_eq!(tree.load_error(gone), None);
    }

    #[test]
    fn test_extra_visible_names_survive_filtering() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        tree.set_extra_visible(vec![".secrets".into()]);
        let root = tree.root();

        tree.materialize(
            root,
            vec![
                entry(".secrets", false),
                entry(".secrets.local", false),
                entry(".other", false),
                entry("a.txt", false),
            ],
        )
        .unwrap();

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec![".secrets", ".secrets.local", "a.txt"]);
    }

    #[test]
    fn test_should_list_with_extra() {
        let extra = vec![CompactString::const_new(".secrets")];
        assert!(!should_list(".secrets", false));
        assert!(should_list_with(".secrets", false, &extra));
        assert!(should_list_with(".secrets.bak", false, &extra));
        assert!(!should_list_with(".other", false, &extra));
        // skip-dirs still win over extras
        assert!(!should_list_with("node_modules", true, &extra));
    }

    #[test]
    fn test_rename_node_resorts_and_updates_paths() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("alpha.txt", false), entry("mid.txt", false)])
            .unwrap();
        let alpha = tree.children(root).unwrap()[0];
        // warm the path cache before the rename
        assert_eq!(tree.full_path(alpha), PathBuf::from("/project/alpha.txt"));

        tree.rename_node(alpha, "zeta.txt").unwrap();

        assert_eq!(tree.get_name(alpha), Some("zeta.txt"));
        assert_eq!(tree.full_path(alpha), PathBuf::from("/project/zeta.txt"));
        assert_eq!(
            tree.find_node_by_path(Path::new("/project/alpha.txt")),
            None
        );

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["mid.txt", "zeta.txt"]);
    }

    #[test]
    fn test_rename_rejects_conflicts_and_root() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("a.txt", false), entry("b.txt", false)])
            .unwrap();
        let a = tree.children(root).unwrap()[0];

        assert_eq!(
            tree.rename_node(a, "b.txt"),
            Err(FileTreeError::NameExists)
        );
        assert_eq!(
            tree.rename_node(root, "elsewhere"),
            Err(FileTreeError::CannotModifyRoot)
        );
        // renaming to its own name is a no-op
        assert_eq!(tree.rename_node(a, "a.txt"), Ok(()));
    }

    #[test]
    fn test_remove_node_detaches_subtree() {
        let mut tree = FileTree::new_with_root(PathBuf::from("/project"));
        let root = tree.root();
        tree.materialize(root, vec![entry("sub", true), entry("keep.txt", false)])
            .unwrap();
        let sub = tree.children(root).unwrap()[0];
        tree.materialize(sub, vec![entry("inner.txt", false)]).unwrap();

        tree.remove_node(sub).unwrap();

        let names: Vec<&str> = tree
            .children(root)
            .unwrap()
            .to_vec()
            .into_iter()
            .map(|id| tree.get_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["keep.txt"]);
        assert_eq!(tree.find_node_by_path(Path::new("/project/sub")), None);
        assert_eq!(
            tree.remove_node(root),
            Err(FileTreeError::CannotModifyRoot)
        );
    }
}
