//! 打开文件会话：标签页、脏标记、编辑版本
//!
//! Content is a plain snapshot per open file. Dirty is recomputed as
//! `content != saved_content`, so saving an older snapshot while newer
//! edits exist leaves the tab dirty.

use crate::models::LanguageId;
use crate::services::path::display_name;
use compact_str::CompactString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OpenFile {
    pub path: PathBuf,
    pub display_name: CompactString,
    pub language: &'static str,
    pub content: String,
    pub saved_content: String,
    pub dirty: bool,
    /// Monotone per tab, bumped on every edit. Save acknowledgements carry
    /// the version captured at write time.
    pub edit_version: u64,
}

#[derive(Debug, Default)]
pub struct EditorState {
    files: Vec<OpenFile>,
    active: Option<usize>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[OpenFile] {
        &self.files
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_file(&self) -> Option<&OpenFile> {
        self.active.and_then(|i| self.files.get(i))
    }

    pub fn file(&self, index: usize) -> Option<&OpenFile> {
        self.files.get(index)
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|f| f.path == path)
    }

    pub fn has_dirty(&self) -> bool {
        self.files.iter().any(|f| f.dirty)
    }

    /// Opens a tab for `path`, or re-focuses the existing one without
    /// touching its content. Returns (index, state_changed).
    pub fn open(&mut self, path: PathBuf, content: String) -> (usize, bool) {
        if let Some(index) = self.index_of(&path) {
            let changed = self.active != Some(index);
            self.active = Some(index);
            return (index, changed);
        }

        let name = display_name(&path);
        let language = LanguageId::tag_for_path(&path);
        self.files.push(OpenFile {
            display_name: name.into(),
            language,
            saved_content: content.clone(),
            content,
            dirty: false,
            edit_version: 0,
            path,
        });
        let index = self.files.len() - 1;
        self.active = Some(index);
        (index, true)
    }

    pub fn edit(&mut self, index: usize, content: String) -> bool {
        let Some(file) = self.files.get_mut(index) else {
            return false;
        };
        if file.content == content {
            return false;
        }
        file.content = content;
        file.dirty = file.content != file.saved_content;
        file.edit_version += 1;
        true
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.files.len() || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Records that `content` is now on disk for `path`. Dirty is
    /// recomputed against the current buffer, so an acknowledgement for a
    /// stale snapshot never hides newer edits.
    pub fn mark_saved(&mut self, path: &Path, version: u64, content: String) -> bool {
        let Some(index) = self.index_of(path) else {
            return false;
        };
        let file = &mut self.files[index];
        if version < file.edit_version {
            tracing::debug!(
                path = %path.display(),
                version,
                current = file.edit_version,
                "save acknowledged for stale snapshot"
            );
        }
        file.saved_content = content;
        let was_dirty = file.dirty;
        file.dirty = file.content != file.saved_content;
        was_dirty != file.dirty
    }

    /// Removes a tab. The active tab moves to the nearest remaining one
    /// (same index, else the last).
    pub fn close(&mut self, index: usize) -> Option<OpenFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);

        self.active = if self.files.is_empty() {
            None
        } else {
            match self.active {
                Some(active) if active == index => Some(index.min(self.files.len() - 1)),
                Some(active) if active > index => Some(active - 1),
                other => other,
            }
        };

        Some(removed)
    }

    /// Rewrites tab paths after a rename on disk. Covers both the renamed
    /// entry itself and, for directories, everything open beneath it.
    /// Dirty state and content are untouched.
    pub fn apply_rename(&mut self, from: &Path, to: &Path) -> bool {
        let mut changed = false;
        for file in &mut self.files {
            let new_path = if file.path == from {
                Some(to.to_path_buf())
            } else {
                file.path
                    .strip_prefix(from)
                    .ok()
                    .map(|rest| to.join(rest))
            };
            let Some(new_path) = new_path else {
                continue;
            };
            file.display_name = display_name(&new_path).into();
            file.language = LanguageId::tag_for_path(&new_path);
            file.path = new_path;
            changed = true;
        }
        changed
    }

    /// Closes every tab at or beneath `path`. Used when the entry is
    /// deleted on disk; there is nothing left to save.
    pub fn close_under(&mut self, path: &Path) -> usize {
        let mut closed = 0;
        while let Some(index) = self
            .files
            .iter()
            .position(|f| f.path == path || f.path.starts_with(path))
        {
            self.close(index);
            closed += 1;
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(editor: &mut EditorState, path: &str, content: &str) -> usize {
        editor.open(PathBuf::from(path), content.to_string()).0
    }

    #[test]
    fn test_open_is_idempotent_by_path() {
        let mut editor = EditorState::new();
        let a = open(&mut editor, "/p/a.txt", "aaa");
        let b = open(&mut editor, "/p/b.txt", "bbb");

        editor.edit(a, "aaa edited".to_string());
        assert_eq!(editor.active_index(), Some(b));

        // reopening focuses the existing tab, content intact
        let (again, _) = editor.open(PathBuf::from("/p/a.txt"), "stale read".to_string());
        assert_eq!(again, a);
        assert_eq!(editor.files().len(), 2);
        assert_eq!(editor.file(a).unwrap().content, "aaa edited");
        assert!(editor.file(a).unwrap().dirty);
    }

    #[test]
    fn test_edit_sets_dirty_and_bumps_version() {
        let mut editor = EditorState::new();
        let i = open(&mut editor, "/p/a.txt", "one");

        assert!(editor.edit(i, "two".to_string()));
        let file = editor.file(i).unwrap();
        assert!(file.dirty);
        assert_eq!(file.edit_version, 1);

        // no-op edit
        assert!(!editor.edit(i, "two".to_string()));
        assert_eq!(editor.file(i).unwrap().edit_version, 1);

        // editing back to the saved content clears dirty
        assert!(editor.edit(i, "one".to_string()));
        assert!(!editor.file(i).unwrap().dirty);
    }

    #[test]
    fn test_mark_saved_round_trip() {
        let mut editor = EditorState::new();
        let i = open(&mut editor, "/p/a.txt", "one");
        editor.edit(i, "two".to_string());

        let version = editor.file(i).unwrap().edit_version;
        editor.mark_saved(Path::new("/p/a.txt"), version, "two".to_string());
        assert!(!editor.file(i).unwrap().dirty);
    }

    #[test]
    fn test_stale_save_keeps_newer_edits_dirty() {
        let mut editor = EditorState::new();
        let i = open(&mut editor, "/p/a.txt", "one");

        editor.edit(i, "two".to_string());
        let snapshot_version = editor.file(i).unwrap().edit_version;
        editor.edit(i, "three".to_string());

        editor.mark_saved(Path::new("/p/a.txt"), snapshot_version, "two".to_string());
        let file = editor.file(i).unwrap();
        assert!(file.dirty);
        assert_eq!(file.content, "three");
        assert_eq!(file.saved_content, "two");
    }

    #[test]
    fn test_close_moves_active_to_nearest_tab() {
        let mut editor = EditorState::new();
        let _a = open(&mut editor, "/p/a.txt", "");
        let b = open(&mut editor, "/p/b.txt", "");
        let c = open(&mut editor, "/p/c.txt", "");

        // closing the last active tab falls back to the new last
        editor.set_active(c);
        editor.close(c);
        assert_eq!(editor.active_index(), Some(b));

        // closing a middle tab keeps the same position
        let _d = open(&mut editor, "/p/d.txt", "");
        editor.set_active(b);
        editor.close(b);
        assert_eq!(editor.active_index(), Some(b));
        assert_eq!(editor.active_file().unwrap().display_name, "d.txt");
    }

    #[test]
    fn test_close_non_active_keeps_active_file() {
        let mut editor = EditorState::new();
        let a = open(&mut editor, "/p/a.txt", "");
        let b = open(&mut editor, "/p/b.txt", "");

        editor.set_active(b);
        editor.close(a);
        assert_eq!(editor.active_file().unwrap().display_name, "b.txt");

        editor.close(editor.active_index().unwrap());
        assert_eq!(editor.active_index(), None);
    }

    #[test]
    fn test_apply_rename_updates_tab_and_descendants() {
        let mut editor = EditorState::new();
        let a = open(&mut editor, "/p/old.txt", "body");
        let b = open(&mut editor, "/p/dir/inner.rs", "fn x() {}");
        editor.edit(a, "body edited".to_string());

        editor.apply_rename(Path::new("/p/old.txt"), Path::new("/p/new.md"));
        let file = editor.file(a).unwrap();
        assert_eq!(file.path, PathBuf::from("/p/new.md"));
        assert_eq!(file.display_name, "new.md");
        assert_eq!(file.language, "markdown");
        assert_eq!(file.content, "body edited");
        assert!(file.dirty);

        editor.apply_rename(Path::new("/p/dir"), Path::new("/p/renamed"));
        assert_eq!(
            editor.file(b).unwrap().path,
            PathBuf::from("/p/renamed/inner.rs")
        );
    }

    #[test]
    fn test_close_under_removes_nested_tabs() {
        let mut editor = EditorState::new();
        let _a = open(&mut editor, "/p/dir/one.txt", "");
        let _b = open(&mut editor, "/p/dir/sub/two.txt", "");
        let c = open(&mut editor, "/p/other.txt", "");
        editor.set_active(c);

        let closed = editor.close_under(Path::new("/p/dir"));
        assert_eq!(closed, 2);
        assert_eq!(editor.files().len(), 1);
        assert_eq!(editor.active_file().unwrap().display_name, "other.txt");
    }

    #[test]
    fn test_language_tag() {
        let mut editor = EditorState::new();
        let i = open(&mut editor, "/p/index.html", "<html>");
        assert_eq!(editor.file(i).unwrap().language, "html");
        let j = open(&mut editor, "/p/LICENSE", "");
        assert_eq!(editor.file(j).unwrap().language, "plaintext");
    }
}
