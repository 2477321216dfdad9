//! 文件系统 Provider trait
//!
//! 抽象文件系统操作，方便在测试里替换为内存后端

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    Io(io::Error),
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    AlreadyExists(PathBuf),
    NotADirectory(PathBuf),
    NotAFile(PathBuf),
    InvalidPath(String),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(e) => write!(f, "IO error: {}", e),
            FileError::NotFound(p) => write!(f, "Not found: {}", p.display()),
            FileError::PermissionDenied(p) => write!(f, "Permission denied: {}", p.display()),
            FileError::AlreadyExists(p) => write!(f, "Already exists: {}", p.display()),
            FileError::NotADirectory(p) => write!(f, "Not a directory: {}", p.display()),
            FileError::NotAFile(p) => write!(f, "Not a file: {}", p.display()),
            FileError::InvalidPath(s) => write!(f, "Invalid path: {}", s),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

impl FileError {
    /// Classifies a raw io::Error against the path it came from.
    pub fn from_io(e: io::Error, path: &Path) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path.to_path_buf()),
            _ => FileError::Io(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self { path, name, is_dir }
    }
}

pub trait FileProvider: Send + Sync {
    fn scheme(&self) -> &'static str;

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> Result<String>;

    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn delete_file(&self, path: &Path) -> Result<()>;

    fn delete_dir_all(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn stat(&self, path: &Path) -> Result<FileMetadata>;

    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn from_std(meta: std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            modified: meta.modified().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_new() {
        let entry = DirEntry::new(PathBuf::from("/test/file.txt"), false);
        assert_eq!(entry.name, "file.txt");
        assert!(!entry.is_dir);
    }

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test"));
        assert!(err.to_string().contains("/test"));
    }

    #[test]
    fn test_from_io_classifies_kind() {
        let path = Path::new("/p");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            FileError::from_io(not_found, path),
            FileError::NotFound(_)
        ));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            FileError::from_io(denied, path),
            FileError::PermissionDenied(_)
        ));
    }
}
