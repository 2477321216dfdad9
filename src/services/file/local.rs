//! 本地文件系统 Provider
//!
//! 实现 FileProvider trait，操作本地文件系统

use super::provider::{DirEntry, FileError, FileMetadata, FileProvider, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProvider for LocalFileProvider {
    fn scheme(&self) -> &'static str {
        "file"
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| FileError::from_io(e, path))? {
            let entry = entry?;
            let entry_path = entry.path();
            let metadata = entry.metadata()?;

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry_path,
                is_dir: metadata.is_dir(),
            });
        }

        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        if path.exists() && !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        fs::read_to_string(path).map_err(|e| FileError::from_io(e, path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| FileError::from_io(e, parent))?;
            }
        }
        fs::write(path, content).map_err(|e| FileError::from_io(e, path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| FileError::from_io(e, path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(FileError::NotFound(from.to_path_buf()));
        }
        if to.exists() {
            return Err(FileError::AlreadyExists(to.to_path_buf()));
        }
        fs::rename(from, to).map_err(|e| FileError::from_io(e, from))
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        fs::remove_file(path).map_err(|e| FileError::from_io(e, path))
    }

    fn delete_dir_all(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }
        fs::remove_dir_all(path).map_err(|e| FileError::from_io(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn stat(&self, path: &Path) -> Result<FileMetadata> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        let meta = fs::metadata(path).map_err(|e| FileError::from_io(e, path))?;
        Ok(FileMetadata::from_std(meta))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| FileError::from_io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_read_write_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        let provider = LocalFileProvider::new();

        provider.write_file(&file_path, "Hello, World!").unwrap();
        assert!(provider.exists(&file_path));
        assert!(provider.is_file(&file_path));

        let content = provider.read_file(&file_path).unwrap();
        assert_eq!(content, "Hello, World!");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a/b/deep.txt");

        let provider = LocalFileProvider::new();
        provider.write_file(&file_path, "deep").unwrap();

        assert_eq!(provider.read_file(&file_path).unwrap(), "deep");
    }

    #[test]
    fn test_read_dir() {
        let dir = tempdir().unwrap();

        fs::create_dir(dir.path().join("subdir")).unwrap();
        File::create(dir.path().join("file1.txt")).unwrap();
        File::create(dir.path().join("file2.txt")).unwrap();

        let provider = LocalFileProvider::new();
        let entries = provider.read_dir(dir.path()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries.iter().filter(|e| e.is_dir).count(), 1);
    }

    #[test]
    fn test_read_dir_not_a_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        File::create(&file_path).unwrap();

        let provider = LocalFileProvider::new();
        let result = provider.read_dir(&file_path);
        assert!(matches!(result, Err(FileError::NotADirectory(_))));
    }

    #[test]
    fn test_rename() {
        let dir = tempdir().unwrap();
        let old_path = dir.path().join("old.txt");
        let new_path = dir.path().join("new.txt");

        let provider = LocalFileProvider::new();

        provider.write_file(&old_path, "content").unwrap();
        provider.rename(&old_path, &new_path).unwrap();

        assert!(!provider.exists(&old_path));
        assert!(provider.exists(&new_path));
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let provider = LocalFileProvider::new();
        provider.write_file(&a, "a").unwrap();
        provider.write_file(&b, "b").unwrap();

        let result = provider.rename(&a, &b);
        assert!(matches!(result, Err(FileError::AlreadyExists(_))));
        assert_eq!(provider.read_file(&b).unwrap(), "b");
    }

    #[test]
    fn test_delete_file_and_dir() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("gone.txt");
        let subdir = dir.path().join("sub");

        let provider = LocalFileProvider::new();
        provider.write_file(&file_path, "x").unwrap();
        provider.write_file(&subdir.join("inner.txt"), "y").unwrap();

        provider.delete_file(&file_path).unwrap();
        assert!(!provider.exists(&file_path));

        provider.delete_dir_all(&subdir).unwrap();
        assert!(!provider.exists(&subdir));

        let result = provider.delete_file(&file_path);
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[test]
    fn test_stat() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        let provider = LocalFileProvider::new();
        provider.write_file(&file_path, "Hello").unwrap();

        let meta = provider.stat(&file_path).unwrap();
        assert!(meta.is_file);
        assert!(!meta.is_dir);
        assert_eq!(meta.size, 5);
        assert!(meta.modified.is_some());

        let result = provider.stat(&dir.path().join("missing"));
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[test]
    fn test_not_found_error() {
        let provider = LocalFileProvider::new();
        let result = provider.read_file(Path::new("/nonexistent/file.txt"));
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }
}
