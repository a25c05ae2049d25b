use std::sync::RwLock;

use chronicle_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::traits::HeadStore;

/// In-memory head pointer for tests and ephemeral vaults.
#[derive(Debug, Default)]
pub struct InMemoryHeadStore {
    head: RwLock<Option<ObjectId>>,
}

impl InMemoryHeadStore {
    /// Create a store with no head set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeadStore for InMemoryHeadStore {
    fn head(&self) -> RefResult<Option<ObjectId>> {
        let head = self.head.read().map_err(|_| RefError::Poisoned)?;
        Ok(*head)
    }

    fn set_head(&self, id: ObjectId) -> RefResult<()> {
        let mut head = self.head.write().map_err(|_| RefError::Poisoned)?;
        *head = Some(id);
        Ok(())
    }
}
