//! 配置服务：应用设置的加载与保存
//!
//! settings.json 存放在平台缓存目录下，字段缺失时回退默认值

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SETTINGS_DIR: &str = ".acode";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Quiet period after the last edit before an auto-save fires.
    #[serde(default = "default_auto_save_delay_ms")]
    pub auto_save_delay_ms: u64,
    /// File opened automatically when a freshly loaded root contains it.
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
    /// Extra dot-entries to keep visible beyond the built-in allow-list.
    #[serde(default)]
    pub extra_visible_hidden: Vec<String>,
}

fn default_auto_save_delay_ms() -> u64 {
    500
}

fn default_file_name() -> String {
    "index.html".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save_delay_ms: default_auto_save_delay_ms(),
            default_file_name: default_file_name(),
            extra_visible_hidden: Vec::new(),
        }
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&path, content)?;
    }
    Ok(path)
}

pub fn load_settings() -> Option<Settings> {
    let path = get_settings_path()?;
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
