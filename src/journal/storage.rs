use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A place to keep named blobs of text between sessions
pub(crate) trait Storage {
    /// Returns `Ok(None)` if nothing has been written to `slot` yet
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StorageError>;
}

/// Keeps each slot in a `{slot}.json` file inside a directory
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub(crate) fn new<P: Into<PathBuf>>(dir: P) -> FileStorage {
        FileStorage { dir: dir.into() }
    }

    pub(crate) fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.slot_path(slot);
        // Write to a sibling and rename it into place so that the slot is
        // never left half-written
        let staged = path.with_extension("json.tmp");
        if let Err(source) = fs::write(&staged, contents) {
            return Err(StorageError::Write {
                path: staged,
                source,
            });
        }
        if let Err(source) = fs::rename(&staged, &path) {
            let _ = fs::remove_file(&staged);
            return Err(StorageError::Write { path, source });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn path(&self) -> &Path {
        match self {
            StorageError::Read { path, .. } | StorageError::Write { path, .. } => path,
        }
    }
}

#[cfg(test)]
pub(crate) use self::memory::MemoryStorage;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slot() {
        let tmpdir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmpdir.path().join("never-created"));
        assert_eq!(storage.read("entries").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let tmpdir = tempfile::tempdir().unwrap();
        let dir = tmpdir.path().join("nested").join("data");
        let mut storage = FileStorage::new(&dir);
        storage.write("entries", "{}").unwrap();
        assert_eq!(storage.read("entries").unwrap().as_deref(), Some("{}"));
        storage.write("entries", r#"{"a":1}"#).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("entries.json")).unwrap(),
            r#"{"a":1}"#
        );
        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(leftovers, ["entries.json"]);
    }

    #[test]
    fn test_unwritable_dir() {
        let tmpdir = tempfile::tempdir().unwrap();
        let blocker = tmpdir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut storage = FileStorage::new(&blocker);
        let e = storage.write("entries", "{}").unwrap_err();
        assert!(matches!(e, StorageError::Write { .. }));
        assert_eq!(e.path(), blocker);
    }

    #[test]
    fn test_failed_rename_removes_staged_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        // A non-empty directory in the slot's place cannot be replaced
        fs::create_dir(tmpdir.path().join("entries.json")).unwrap();
        fs::write(tmpdir.path().join("entries.json").join("keep"), "").unwrap();
        let mut storage = FileStorage::new(tmpdir.path());
        let e = storage.write("entries", "{}").unwrap_err();
        assert!(matches!(e, StorageError::Write { .. }));
        assert_eq!(e.path(), tmpdir.path().join("entries.json"));
        assert!(!tmpdir.path().join("entries.json.tmp").exists());
    }

    #[test]
    fn test_unreadable_slot() {
        let tmpdir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        fs::create_dir(tmpdir.path().join("entries.json")).unwrap();
        let storage = FileStorage::new(tmpdir.path());
        let e = storage.read("entries").unwrap_err();
        assert!(matches!(e, StorageError::Read { .. }));
        assert_eq!(e.path(), tmpdir.path().join("entries.json"));
    }
}
