//! Durable key-value storage for small serialized values
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// A place where string values can be stored under string keys and read back
/// across runs of the program
pub(crate) trait KeyValueStore {
    /// Return the value stored under `key`, or `None` if nothing is stored
    /// there
    fn get(&self, key: &str) -> Result<Option<String>, LoadError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), SaveError>;
}

/// Storage in a directory on disk, one `{key}.json` file per key
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub(crate) fn new<P: Into<PathBuf>>(dir: P) -> FileStore {
        FileStore { dir: dir.into() }
    }

    /// Return the default data directory
    pub(crate) fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("gridsnake"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LoadError> {
        match fs_err::read_to_string(self.key_path(key)) {
            Ok(src) => Ok(Some(src)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadError::read(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SaveError> {
        fs_err::create_dir_all(&self.dir).map_err(SaveError::mkdir)?;
        let mut src = value.to_owned();
        src.push('\n');
        fs_err::write(self.key_path(key), &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// Storage that only lasts as long as the value itself
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(RefCell<HashMap<String, String>>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LoadError> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SaveError> {
        let _ = self
            .0
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save high scores")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }

    pub(crate) fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high scores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high scores to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read high scores")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    pub(crate) fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read high scores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high scores")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_missing_key() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn file_store_creates_directories() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("data"));
        store.set("key", "[1, 2, 3]").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("[1, 2, 3]\n"));
        assert!(store.dir.join("key.json").is_file());
    }

    #[test]
    fn file_store_overwrites() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.set("key", "old").unwrap();
        store.set("key", "new").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("new\n"));
    }

    #[test]
    fn file_store_unreadable_key() {
        let tmp = tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("key.json")).unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.get("key").is_err());
    }

    #[test]
    fn memory_store() {
        let store = MemoryStore::default();
        assert_eq!(store.get("key").unwrap(), None);
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
    }
}
