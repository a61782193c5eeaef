//! Filesystem gateway backed by `std::fs`.

use crate::backend::{FileInfo, FileSystem};
use std::fs;
use std::io;
use std::path::Path;

/// Real filesystem access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs.
    pub fn new() -> Self {
        Self
    }
}

fn file_info(name: String, metadata: &fs::Metadata) -> FileInfo {
    FileInfo {
        name,
        is_dir: metadata.is_dir(),
        len: if metadata.is_dir() { 0 } else { metadata.len() },
    }
}

impl FileSystem for LocalFs {
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(file_info(name, &metadata));
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(file_info(name, &metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_stat() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.tf");

        LocalFs.write_file(&path, b"resource {}", 0o644).unwrap();

        let info = LocalFs.stat(&path).unwrap();
        assert_eq!(info.name, "main.tf");
        assert!(!info.is_dir);
        assert_eq!(info.len, 11);
        assert_eq!(fs::read_to_string(&path).unwrap(), "resource {}");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.tfvars");
        LocalFs.write_file(&path, b"x=1", 0o600).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_write_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.tfvars");
        LocalFs.write_file(&path, b"first, longer", 0o644).unwrap();
        LocalFs.write_file(&path, b"second", 0o644).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_read_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tfvars"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut entries = LocalFs.read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.tfvars");
        assert!(!entries[0].is_dir);
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_dir);
    }

    #[test]
    fn test_stat_missing() {
        let dir = TempDir::new().unwrap();
        let err = LocalFs.stat(&dir.path().join("terraform.tfstate")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_create_dir_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join(".terraform").join("providers");
        LocalFs.create_dir_all(&nested).unwrap();
        LocalFs.create_dir_all(&nested).unwrap();
        assert!(LocalFs.stat(&nested).unwrap().is_dir);
    }
}
