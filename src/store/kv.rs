//! Persistence for the uploaded background template.
//!
//! The host injects a [`KeyValueStore`]; the editor only ever touches [`BACKGROUND_KEY`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{NewscardError, NewscardResult};

/// Key under which the uploaded background data URL is kept.
pub const BACKGROUND_KEY: &str = "news_template_bg_solid";
/// Values at or above this many characters are not persisted.
pub const BACKGROUND_MAX_CHARS: usize = 5_000_000;

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> NewscardResult<Option<String>>;

    /// Store `value` unless it has `max_chars` characters or more. Returns whether it was stored.
    fn set(&mut self, key: &str, value: &str, max_chars: usize) -> NewscardResult<bool>;

    fn remove(&mut self, key: &str) -> NewscardResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> NewscardResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str, max_chars: usize) -> NewscardResult<bool> {
        (**self).set(key, value, max_chars)
    }

    fn remove(&mut self, key: &str) -> NewscardResult<()> {
        (**self).remove(key)
    }
}

fn fits(value: &str, max_chars: usize) -> bool {
    value.chars().take(max_chars).count() < max_chars
}

/// In-process store, used by tests and one-shot CLI runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> NewscardResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str, max_chars: usize) -> NewscardResult<bool> {
        if !fits(value, max_chars) {
            return Ok(false);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    fn remove(&mut self, key: &str) -> NewscardResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> NewscardResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create store dir '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> NewscardResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(NewscardError::validation(format!(
                "store key '{key}' must be non-empty ASCII [A-Za-z0-9_.-] and not start with '.'"
            )));
        }
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> NewscardResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)
            .with_context(|| format!("read store entry '{}'", path.display()))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str, max_chars: usize) -> NewscardResult<bool> {
        let path = self.path_for(key)?;
        if !fits(value, max_chars) {
            tracing::debug!(key, "value too large to persist");
            return Ok(false);
        }
        std::fs::write(&path, value)
            .with_context(|| format!("write store entry '{}'", path.display()))?;
        Ok(true)
    }

    fn remove(&mut self, key: &str) -> NewscardResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("remove store entry '{}'", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/kv.rs"]
mod tests;
