//! Layout snapshots and the persistence collaborator
//!
//! A layout is a named, persisted snapshot of every window plus the stack
//! order. The registry treats the store as an opaque key-value blob store;
//! blobs are JSON with an explicit version field so future schema changes
//! can be detected instead of guessed at.
//!
//! Two stores are provided: an in-memory store for tests and ephemeral
//! sessions, and a file-backed store keeping one JSON file per layout.

use crate::registry::Window;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Current snapshot schema version
pub const LAYOUT_VERSION: u32 = 1;

/// Key-value blob store consumed by the registry for named layouts.
///
/// Store failures propagate to the registry caller unchanged; the registry
/// performs no retries.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Serialized form of the registry's full state. Windows are stored in
/// stack order (back to front), and the stack is kept redundantly so a
/// decoded snapshot can be cross-checked before it replaces live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub windows: Vec<Window>,
    pub stack: Vec<String>,
}

impl LayoutSnapshot {
    /// Build a snapshot from windows already in stack order
    pub fn capture(windows: Vec<Window>) -> Self {
        let stack = windows.iter().map(|window| window.id.clone()).collect();
        Self {
            version: LAYOUT_VERSION,
            windows,
            stack,
        }
    }

    /// Reject snapshots this build cannot interpret or that violate the
    /// stack/table consistency invariant.
    pub fn validate(&self) -> Result<()> {
        if self.version != LAYOUT_VERSION {
            bail!(
                "unsupported layout version {} (expected {})",
                self.version,
                LAYOUT_VERSION
            );
        }

        let window_ids: HashSet<&str> = self.windows.iter().map(|w| w.id.as_str()).collect();
        if window_ids.len() != self.windows.len() {
            bail!("layout contains duplicate window ids");
        }

        let stack_ids: HashSet<&str> = self.stack.iter().map(String::as_str).collect();
        if stack_ids.len() != self.stack.len() {
            bail!("layout stack contains duplicate ids");
        }
        if stack_ids != window_ids {
            bail!("layout stack does not match its window set");
        }

        Ok(())
    }

    /// Decompose into registry state. Call [`Self::validate`] first.
    pub fn into_state(self) -> (HashMap<String, Window>, VecDeque<String>) {
        let windows = self
            .windows
            .into_iter()
            .map(|window| (window.id.clone(), window))
            .collect();
        (windows, self.stack.into())
    }
}

/// In-memory layout store
#[derive(Default)]
pub struct MemoryLayoutStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .keys()
            .filter(|key| prefix.map_or(true, |p| key.starts_with(p)))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// File-backed layout store keeping one `<name>.json` per layout
pub struct FileLayoutStore {
    directory: PathBuf,
}

impl FileLayoutStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Map a layout name to its file path, rejecting names that would
    /// escape the store directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            bail!("layout name must not be empty");
        }
        if key.contains('/') || key.contains('\\') || key == "." || key == ".." {
            bail!("invalid layout name: {:?}", key);
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl LayoutStore for FileLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read layout {:?}", key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| {
                format!("Failed to create layout directory {}", self.directory.display())
            })?;
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("Failed to write layout {:?}", key))
    }

    async fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to list layout directory {}", self.directory.display())
                })
            }
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if prefix.map_or(true, |p| stem.starts_with(p)) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete layout {:?}", key)),
        }
    }
}
