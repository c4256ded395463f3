use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use habit_domain::vault::HabitVault;

/// File-backed vault. Each key maps to `<dir>/<key>.json`; a key that has
/// never been saved loads as `None`. Writes go through `fs::write` after
/// ensuring the directory exists.
pub struct FileVault {
    dir: PathBuf,
}

impl FileVault {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl HabitVault for FileVault {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => {
                Err(error).with_context(|| format!("failed to read `{}`", path.display()))
            }
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create `{}`", self.dir.display()))?;
        let path = self.blob_path(key);
        fs::write(&path, bytes)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        debug!(path = %path.display(), len = bytes.len(), "wrote habit blob");
        Ok(())
    }
}
