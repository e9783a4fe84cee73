//! File-backed storage.
//!
//! Each key is one `<key>.json` file under the storage directory. Writes go
//! to a temp file first and are renamed into place, so a crash mid-write
//! leaves either the old or the new value, never a torn one.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{check_key, KeyValueStorage};
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        check_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_key(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let written = write_then_rename(&temp_path, &path, value);
        if written.is_err() {
            // Best effort; the write error is the one worth reporting.
            let _ = fs::remove_file(&temp_path);
        }
        written.map_err(io_err)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

fn write_then_rename(temp_path: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)
}
