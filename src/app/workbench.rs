//! Workbench：连接内核与外部世界
//!
//! 执行 store 请求的副作用、驱动自动保存计时器、处理未保存提示。

use crate::kernel::{Action, AppState, Effect, Store};
use crate::models::DirEntryInfo;
use crate::services::config::Settings;
use crate::services::file::{FileError, FileProvider};
use crate::services::path::project_folder_name;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Dialog capability injected by the shell.
pub trait SavePrompt {
    fn confirm_unsaved(&mut self, display_name: &str) -> SaveChoice;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Auto-save debounce. Every edit rearms the deadline; switching tabs,
/// closing, explicit save and root changes flush or cancel it so no edit
/// is silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoSaveTimer {
    Idle,
    Pending { index: usize, deadline: Instant },
}

const SCAFFOLD_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>New Project</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <h1>Hello, world!</h1>
    <script src="app.js"></script>
</body>
</html>
"#;

const SCAFFOLD_STYLES_CSS: &str = r#"body {
    font-family: system-ui, sans-serif;
    margin: 2rem;
}
"#;

const SCAFFOLD_APP_JS: &str = r#"console.log('Hello, world!');
"#;

pub struct Workbench {
    store: Store,
    provider: Box<dyn FileProvider>,
    prompt: Box<dyn SavePrompt>,
    auto_save: AutoSaveTimer,
    auto_save_delay: Duration,
    notifications: VecDeque<Notification>,
}

impl Workbench {
    pub fn new(
        provider: Box<dyn FileProvider>,
        prompt: Box<dyn SavePrompt>,
        settings: Settings,
    ) -> Self {
        let auto_save_delay = Duration::from_millis(settings.auto_save_delay_ms);
        Self {
            store: Store::new(AppState::new(settings)),
            provider,
            prompt,
            auto_save: AutoSaveTimer::Idle,
            auto_save_delay,
            notifications: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// `"<file> - <project>"` with a trailing `*` while dirty; the bare
    /// app name when nothing is open.
    pub fn window_title(&self) -> String {
        let state = self.store.state();
        let Some(file) = state.editor.active_file() else {
            return crate::APP_NAME.to_string();
        };
        let project = state
            .explorer
            .root_path()
            .map(project_folder_name)
            .unwrap_or_else(|| crate::APP_NAME.to_string());
        let marker = if file.dirty { "*" } else { "" };
        format!("{} - {}{}", file.display_name, project, marker)
    }

    /// Switches the project root. Returns Ok(false) when the user cancels
    /// out of the unsaved-changes prompt; nothing is mutated in that case.
    pub fn open_root(&mut self, path: PathBuf) -> Result<bool, FileError> {
        if !self.confirm_discard_unsaved() {
            return Ok(false);
        }
        self.auto_save = AutoSaveTimer::Idle;
        let result = self.store.dispatch(Action::OpenRoot(path));
        self.run_effects(result.effects);
        Ok(true)
    }

    /// Opens a file into the session. A read failure is surfaced to the
    /// caller and the file never enters the session.
    pub fn open_file(&mut self, path: &Path) -> Result<(), FileError> {
        // re-focusing the tab that owns the pending write keeps the
        // debounce running; anything else flushes it first
        match (self.auto_save, self.store.state().editor.index_of(path)) {
            (AutoSaveTimer::Pending { index, .. }, Some(existing)) if index == existing => {}
            _ => self.flush_pending(),
        }
        let content = match self.provider.read_file(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                self.notify(Severity::Error, format!("Could not open {}: {}", path.display(), e));
                return Err(e);
            }
        };
        let result = self.store.dispatch(Action::OpenFile {
            path: path.to_path_buf(),
            content,
        });
        self.run_effects(result.effects);
        Ok(())
    }

    /// Replaces a tab's content and rearms the auto-save deadline.
    pub fn edit(&mut self, index: usize, content: String, now: Instant) {
        let result = self.store.dispatch(Action::Edit { index, content });
        if !result.state_changed {
            return;
        }
        if let AutoSaveTimer::Pending { index: pending, .. } = self.auto_save {
            if pending != index {
                self.save_tab(pending);
            }
        }
        self.auto_save = AutoSaveTimer::Pending {
            index,
            deadline: now + self.auto_save_delay,
        };
    }

    /// Fires the pending auto-save once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let AutoSaveTimer::Pending { index, deadline } = self.auto_save else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.auto_save = AutoSaveTimer::Idle;
        self.save_tab(index);
        true
    }

    /// Explicit save; cancels any pending auto-save for the tab.
    pub fn save(&mut self, index: usize) -> bool {
        if let AutoSaveTimer::Pending { index: pending, .. } = self.auto_save {
            if pending == index {
                self.auto_save = AutoSaveTimer::Idle;
            }
        }
        self.save_tab(index)
    }

    pub fn toggle_dir(&mut self, id: crate::models::NodeId) {
        let result = self.store.dispatch(Action::ToggleDir(id));
        self.run_effects(result.effects);
    }

    pub fn switch_tab(&mut self, index: usize) {
        self.flush_pending();
        let result = self.store.dispatch(Action::SwitchTab { index });
        self.run_effects(result.effects);
    }

    /// Closes a tab, prompting when it has unsaved changes. Returns
    /// whether the tab was actually removed.
    pub fn close_tab(&mut self, index: usize) -> bool {
        let Some(file) = self.store.state().editor.file(index) else {
            return false;
        };

        if file.dirty {
            let name = file.display_name.to_string();
            match self.prompt.confirm_unsaved(&name) {
                SaveChoice::Cancel => return false,
                SaveChoice::Save => {
                    self.cancel_pending_for(index);
                    if !self.save_tab(index) {
                        // the write failed; keep the tab so nothing is lost
                        return false;
                    }
                }
                SaveChoice::Discard => self.cancel_pending_for(index),
            }
        } else {
            self.cancel_pending_for(index);
        }

        // a pending timer on a later tab shifts down with it
        if let AutoSaveTimer::Pending {
            index: pending,
            deadline,
        } = self.auto_save
        {
            if pending > index {
                self.auto_save = AutoSaveTimer::Pending {
                    index: pending - 1,
                    deadline,
                };
            }
        }

        let result = self.store.dispatch(Action::CloseTab { index });
        self.run_effects(result.effects);
        true
    }

    /// Renames a tree entry on disk and carries the change through the
    /// tree and any open tabs. The root cannot be renamed.
    pub fn rename_entry(&mut self, id: crate::models::NodeId, new_name: &str) -> Result<(), FileError> {
        if new_name.is_empty() || new_name.contains('/') || new_name.contains('\\') {
            return Err(FileError::InvalidPath(new_name.to_string()));
        }

        self.flush_pending();

        let from = {
            let Some(tree) = self.store.state().explorer.tree() else {
                return Err(FileError::InvalidPath("no project open".to_string()));
            };
            if id == tree.root() {
                return Err(FileError::InvalidPath(
                    "the project root cannot be renamed".to_string(),
                ));
            }
            match tree.path_of(id) {
                Some(path) => path,
                None => return Err(FileError::InvalidPath("unknown entry".to_string())),
            }
        };
        let to = match from.parent() {
            Some(parent) => parent.join(new_name),
            None => return Err(FileError::InvalidPath(new_name.to_string())),
        };

        if let Err(e) = self.provider.rename(&from, &to) {
            tracing::warn!(from = %from.display(), to = %to.display(), error = %e, "rename failed");
            self.notify(
                Severity::Error,
                format!("Could not rename {}: {}", from.display(), e),
            );
            return Err(e);
        }

        let result = self.store.dispatch(Action::EntryRenamed { from, to });
        self.run_effects(result.effects);
        Ok(())
    }

    /// Deletes a tree entry on disk, drops its subtree, and closes any
    /// tabs open beneath it. The root cannot be deleted.
    pub fn delete_entry(&mut self, id: crate::models::NodeId) -> Result<(), FileError> {
        let (path, is_dir) = {
            let Some(tree) = self.store.state().explorer.tree() else {
                return Err(FileError::InvalidPath("no project open".to_string()));
            };
            if id == tree.root() {
                return Err(FileError::InvalidPath(
                    "the project root cannot be deleted".to_string(),
                ));
            }
            match tree.path_of(id) {
                Some(p) => {
                    let is_dir = tree.is_dir(id);
                    (p, is_dir)
                }
                None => return Err(FileError::InvalidPath("unknown entry".to_string())),
            }
        };

        // a pending write aimed beneath the entry is dropped, anything
        // else is flushed first
        if let AutoSaveTimer::Pending { index, .. } = self.auto_save {
            let under = self
                .store
                .state()
                .editor
                .file(index)
                .is_some_and(|f| f.path == path || f.path.starts_with(&path));
            if under {
                self.auto_save = AutoSaveTimer::Idle;
            } else {
                self.flush_pending();
            }
        }

        let outcome = if is_dir {
            self.provider.delete_dir_all(&path)
        } else {
            self.provider.delete_file(&path)
        };
        if let Err(e) = outcome {
            tracing::warn!(path = %path.display(), error = %e, "delete failed");
            self.notify(
                Severity::Error,
                format!("Could not delete {}: {}", path.display(), e),
            );
            return Err(e);
        }

        let result = self.store.dispatch(Action::EntryDeleted { path });
        self.run_effects(result.effects);
        Ok(())
    }

    /// Scaffolds a starter web project and opens it as the new root.
    /// Returns Ok(false) when the user cancels the unsaved-changes prompt.
    pub fn create_project(&mut self, path: &Path) -> Result<bool, FileError> {
        if !self.confirm_discard_unsaved() {
            return Ok(false);
        }
        self.auto_save = AutoSaveTimer::Idle;

        self.provider.create_dir_all(path)?;
        self.provider
            .write_file(&path.join("index.html"), SCAFFOLD_INDEX_HTML)?;
        self.provider
            .write_file(&path.join("styles.css"), SCAFFOLD_STYLES_CSS)?;
        self.provider
            .write_file(&path.join("app.js"), SCAFFOLD_APP_JS)?;
        tracing::info!(path = %path.display(), "project scaffolded");

        let result = self.store.dispatch(Action::OpenRoot(path.to_path_buf()));
        self.run_effects(result.effects);
        Ok(true)
    }

    /// Prompt gate shared by root switches. Save writes first, Discard
    /// drops the pending timer, Cancel aborts the caller.
    fn confirm_discard_unsaved(&mut self) -> bool {
        let Some(file) = self.store.state().editor.active_file() else {
            return true;
        };
        if !file.dirty {
            return true;
        }
        let name = file.display_name.to_string();
        let index = self
            .store
            .state()
            .editor
            .active_index()
            .unwrap_or_default();
        match self.prompt.confirm_unsaved(&name) {
            SaveChoice::Cancel => false,
            SaveChoice::Save => {
                self.cancel_pending_for(index);
                self.save_tab(index)
            }
            SaveChoice::Discard => {
                self.auto_save = AutoSaveTimer::Idle;
                true
            }
        }
    }

    fn cancel_pending_for(&mut self, index: usize) {
        if let AutoSaveTimer::Pending { index: pending, .. } = self.auto_save {
            if pending == index {
                self.auto_save = AutoSaveTimer::Idle;
            }
        }
    }

    /// Writes out any pending auto-save immediately.
    fn flush_pending(&mut self) {
        if let AutoSaveTimer::Pending { index, .. } = self.auto_save {
            self.auto_save = AutoSaveTimer::Idle;
            self.save_tab(index);
        }
    }

    /// Requests a write for the tab and executes it. Returns false only
    /// when a write was attempted and failed; the tab keeps its dirty
    /// state and content for retry.
    fn save_tab(&mut self, index: usize) -> bool {
        let result = self.store.dispatch(Action::RequestSave { index });
        self.run_effects(result.effects)
    }

    /// Executes effects until the queue drains. Returns false when any
    /// write failed.
    fn run_effects(&mut self, effects: Vec<Effect>) -> bool {
        let mut queue = VecDeque::from(effects);
        let mut writes_ok = true;

        while let Some(effect) = queue.pop_front() {
            let followups = match effect {
                Effect::LoadDir(path) => {
                    let action = match self.provider.read_dir(&path) {
                        Ok(entries) => Action::DirLoaded {
                            path,
                            entries: entries
                                .into_iter()
                                .map(|e| DirEntryInfo {
                                    name: e.name.into(),
                                    is_dir: e.is_dir,
                                })
                                .collect(),
                        },
                        Err(e) => Action::DirLoadError {
                            path,
                            message: e.to_string(),
                        },
                    };
                    self.store.dispatch(action).effects
                }
                Effect::LoadFile(path) => match self.provider.read_file(&path) {
                    Ok(content) => {
                        self.store
                            .dispatch(Action::OpenFile { path, content })
                            .effects
                    }
                    Err(e) => {
                        // best-effort open (default-file heuristic)
                        tracing::warn!(path = %path.display(), error = %e, "load skipped");
                        Vec::new()
                    }
                },
                Effect::WriteFile {
                    path,
                    content,
                    version,
                } => match self.provider.write_file(&path, &content) {
                    Ok(()) => {
                        tracing::debug!(path = %path.display(), version, "saved");
                        self.store
                            .dispatch(Action::Saved {
                                path,
                                version,
                                content,
                            })
                            .effects
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "save failed");
                        self.notify(
                            Severity::Error,
                            format!("Could not save {}: {}", path.display(), e),
                        );
                        writes_ok = false;
                        Vec::new()
                    }
                },
            };
            queue.extend(followups);
        }

        writes_ok
    }

    fn notify(&mut self, severity: Severity, message: String) {
        self.notifications.push_back(Notification { severity, message });
    }
}
