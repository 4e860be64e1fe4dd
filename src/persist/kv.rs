use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Minimal key/value storage the project is persisted into.
pub trait KeyValueStore {
    /// Value for `key`, `None` when absent.
    fn get(&self, key: &str) -> FlipbookResult<Option<Vec<u8>>>;
    /// Insert or replace `key`.
    fn put(&mut self, key: &str, value: &[u8]) -> FlipbookResult<()>;
    /// Delete `key`; absent keys are fine.
    fn remove(&mut self, key: &str) -> FlipbookResult<()>;
    /// All keys, sorted.
    fn keys(&self) -> FlipbookResult<Vec<String>>;
}

/// In-memory store for tests and scratch sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FlipbookResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> FlipbookResult<()> {
        self.entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> FlipbookResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> FlipbookResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// One file per key inside a project directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) the directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> FlipbookResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            FlipbookError::storage(format!(
                "failed to create project directory '{}': {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    /// Project directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> FlipbookResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(FlipbookError::validation(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> FlipbookResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FlipbookError::storage(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> FlipbookResult<()> {
        let path = self.path_for(key)?;
        // Entries are replaced atomically through a rename.
        let tmp = self.root.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| FlipbookError::storage(format!("write '{}': {e}", path.display())))
    }

    fn remove(&mut self, key: &str) -> FlipbookResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlipbookError::storage(format!(
                "remove '{}': {e}",
                path.display()
            ))),
        }
    }

    fn keys(&self) -> FlipbookResult<Vec<String>> {
        let mut keys = Vec::new();
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("list project directory '{}'", self.root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| "read project directory entry")?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                keys.push(name.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/kv.rs"]
mod tests;
