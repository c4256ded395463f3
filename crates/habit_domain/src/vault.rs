use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

/// Byte-blob persistence collaborators implement this trait. The store keeps
/// the whole habit collection under a single key and treats the payload as
/// opaque bytes.
pub trait HabitVault: Send + Sync {
    /// Returns the stored blob for `key`, or `None` when nothing has ever
    /// been saved under it.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

impl<V: HabitVault + ?Sized> HabitVault for Arc<V> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).save(key, bytes)
    }
}

/// Process-local vault, useful for tests and embedders without durable
/// storage.
#[derive(Default)]
pub struct MemoryVault {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preloaded(key: &str, bytes: Vec<u8>) -> Self {
        let vault = Self::new();
        vault.blobs.write().insert(key.to_string(), bytes);
        vault
    }
}

impl HabitVault for MemoryVault {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
