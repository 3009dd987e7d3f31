use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kumitate_core::{decode_snapshot, encode_snapshot, GameSnapshot};

use crate::error::StoreError;

pub const LOCAL_GAME_KEY: &str = "kumitate-game";

const SNAPSHOT_EXT: &str = "snapshot";

/// Byte storage addressed by short keys.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

pub fn save_snapshot<S>(store: &mut S, key: &str, snapshot: &GameSnapshot) -> Result<(), StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let bytes = encode_snapshot(snapshot)?;
    store.write(key, &bytes)?;
    tracing::debug!(key, bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// `Ok(None)` when nothing is stored under `key`.
pub fn load_snapshot<S>(store: &S, key: &str) -> Result<Option<GameSnapshot>, StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let Some(bytes) = store.read(key)? else {
        tracing::debug!(key, "no snapshot stored");
        return Ok(None);
    };
    let snapshot = decode_snapshot(&bytes).inspect_err(|err| {
        tracing::warn!(key, %err, "stored snapshot is corrupt");
    })?;
    tracing::debug!(key, pieces = snapshot.pieces.len(), "snapshot loaded");
    Ok(Some(snapshot))
}

/// Text key-value storage holding base64 payloads, the way browser local
/// storage keeps them.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_raw(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(text) = self.entries.get(key) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        STANDARD
            .decode(text)
            .map(Some)
            .map_err(|source| StoreError::Base64 {
                key: key.to_string(),
                source,
            })
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), STANDARD.encode(bytes));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One binary file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Keys are plain names; anything that could leave
    /// the directory is rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{SNAPSHOT_EXT}")))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // replace atomically
        let tmp = path.with_extension(format!("{SNAPSHOT_EXT}.tmp"));
        std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
