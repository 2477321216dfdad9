use super::{Action, AppState, Effect};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: true,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenRoot(path) => {
                tracing::info!(root = %path.display(), "open root");
                // a new root starts a fresh session
                self.state.editor = super::EditorState::new();
                let effects = self
                    .state
                    .explorer
                    .open_root(path, &self.state.settings.extra_visible_hidden);
                DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::ToggleDir(id) => {
                let (state_changed, effects) = self.state.explorer.toggle_dir(id);
                DispatchResult {
                    effects,
                    state_changed,
                }
            }
            Action::DirLoaded { path, entries } => {
                let (state_changed, default_open) = self.state.explorer.apply_dir_loaded(
                    path,
                    entries,
                    &self.state.settings.default_file_name,
                );
                let effects = match default_open {
                    Some(path) => vec![Effect::LoadFile(path)],
                    None => Vec::new(),
                };
                DispatchResult {
                    effects,
                    state_changed,
                }
            }
            Action::DirLoadError { path, message } => {
                tracing::warn!(path = %path.display(), %message, "directory load failed");
                let state_changed = self.state.explorer.apply_dir_load_error(path, message);
                DispatchResult {
                    effects: Vec::new(),
                    state_changed,
                }
            }
            Action::OpenFile { path, content } => {
                let (_, state_changed) = self.state.editor.open(path.clone(), content);
                self.state.explorer.highlight(&path);
                DispatchResult {
                    effects: Vec::new(),
                    state_changed,
                }
            }
            Action::Edit { index, content } => {
                if self.state.editor.edit(index, content) {
                    DispatchResult::changed()
                } else {
                    DispatchResult::unchanged()
                }
            }
            Action::SwitchTab { index } => {
                if !self.state.editor.set_active(index) {
                    return DispatchResult::unchanged();
                }
                if let Some(file) = self.state.editor.active_file() {
                    let path = file.path.clone();
                    self.state.explorer.highlight(&path);
                }
                DispatchResult::changed()
            }
            Action::RequestSave { index } => {
                let Some(file) = self.state.editor.file(index) else {
                    return DispatchResult::unchanged();
                };
                if !file.dirty {
                    return DispatchResult::unchanged();
                }
                DispatchResult {
                    effects: vec![Effect::WriteFile {
                        path: file.path.clone(),
                        content: file.content.clone(),
                        version: file.edit_version,
                    }],
                    state_changed: false,
                }
            }
            Action::Saved {
                path,
                version,
                content,
            } => {
                tracing::debug!(path = %path.display(), version, "save acknowledged");
                let state_changed = self.state.editor.mark_saved(&path, version, content);
                DispatchResult {
                    effects: Vec::new(),
                    state_changed,
                }
            }
            Action::CloseTab { index } => {
                if self.state.editor.close(index).is_none() {
                    return DispatchResult::unchanged();
                }
                match self.state.editor.active_file() {
                    Some(file) => {
                        let path = file.path.clone();
                        self.state.explorer.highlight(&path);
                    }
                    None => {
                        self.state.explorer.clear_highlight();
                    }
                }
                DispatchResult::changed()
            }
            Action::EntryRenamed { from, to } => {
                tracing::info!(from = %from.display(), to = %to.display(), "entry renamed");
                let tree_changed = self.state.explorer.apply_rename(&from, &to);
                let tabs_changed = self.state.editor.apply_rename(&from, &to);
                if let Some(file) = self.state.editor.active_file() {
                    let path = file.path.clone();
                    self.state.explorer.highlight(&path);
                }
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: tree_changed || tabs_changed,
                }
            }
            Action::EntryDeleted { path } => {
                tracing::info!(path = %path.display(), "entry deleted");
                let closed = self.state.editor.close_under(&path);
                let tree_changed = self.state.explorer.apply_delete(&path);
                match self.state.editor.active_file() {
                    Some(file) => {
                        let active = file.path.clone();
                        self.state.explorer.highlight(&active);
                    }
                    None => {
                        self.state.explorer.clear_highlight();
                    }
                }
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: closed > 0 || tree_changed,
                }
            }
        }
    }
}
