//! In-memory slot backend

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::SlotBackend;
use crate::{Error, Result};

/// Process-local slots; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| Error::Internal("memory backend lock poisoned".to_string()))?;
        Ok(slots.get(slot).cloned())
    }

    async fn write(&self, slot: &str, contents: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| Error::Internal("memory backend lock poisoned".to_string()))?;
        slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }
}
