//! Whole-file storage for the WireGuard config and the ledger
//!
//! Files are read in one go and replaced atomically: contents are written to
//! a temporary file in the target's directory, synced, and renamed over the
//! target. A crash mid-write leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

fn io_error(path: &Path) -> impl Fn(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a UTF-8 text file
pub fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(path = %path.display(), bytes = text.len(), "Read file");
            Ok(text)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(StorageError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(io_error(path)(e)),
    }
}

/// Read a UTF-8 text file, `None` when it does not exist
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match read_text(path) {
        Ok(text) => Ok(Some(text)),
        Err(StorageError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Atomically replace `path` with `contents`
///
/// Permissions of an existing target are carried over to the new file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(path))?;
    tmp.write_all(contents).map_err(io_error(path))?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error(path))?;
    }

    tmp.as_file().sync_all().map_err(io_error(path))?;
    tmp.persist(path).map_err(|e| io_error(path)(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.conf");

        assert!(matches!(read_text(&path), Err(StorageError::NotFound(p)) if p == path));
        assert!(read_text_if_exists(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wg0.conf");

        write_atomic(&path, b"[Interface]\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "[Interface]\n");

        write_atomic(&path, b"replaced").unwrap();
        assert_eq!(read_text(&path).unwrap(), "replaced");
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("peers.csv");

        write_atomic(&path, b"a").unwrap();
        write_atomic(&path, b"b").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope").join("wg0.conf");

        assert!(matches!(
            write_atomic(&path, b"x"),
            Err(StorageError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wg0.conf");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, b"new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
