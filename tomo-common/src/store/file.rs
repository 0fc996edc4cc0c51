//! File slot backend
//!
//! Each slot is a `<slot>.json` file under one directory. Writes go to a
//! temporary sibling first and are renamed into place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::SlotBackend;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Backend rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::InvalidInput(format!("invalid slot name '{}'", slot)));
        }
        Ok(self.dir.join(format!("{}.json", slot)))
    }
}

#[async_trait]
impl SlotBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, slot: &str, contents: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
