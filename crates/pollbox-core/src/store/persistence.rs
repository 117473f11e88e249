//! Storage trait and the in-memory backend

use super::dataset::Dataset;
use crate::error::{PollboxError, Result};
use std::sync::RwLock;

/// Trait for storage implementations.
///
/// `transact` runs the closure against a working copy under an exclusive
/// lock. The copy becomes the committed state only if the closure returns
/// `Ok` and the backend persisted it; otherwise nothing is visible to later
/// reads.
pub trait Storage: Send + Sync {
    /// A consistent copy of the committed data
    fn snapshot(&self) -> Result<Dataset>;

    /// Apply a change atomically
    fn transact(&self, change: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()>;
}

impl<'a> dyn Storage + 'a {
    /// Run `f` in a transaction and return its value
    pub fn transaction<T>(&self, mut f: impl FnMut(&mut Dataset) -> Result<T>) -> Result<T> {
        let mut output = None;
        self.transact(&mut |data| {
            output = Some(f(data)?);
            Ok(())
        })?;
        output.ok_or_else(|| PollboxError::Storage("transaction did not run".to_string()))
    }

    /// Run a read-only query against a snapshot
    pub fn read<T>(&self, f: impl FnOnce(&Dataset) -> Result<T>) -> Result<T> {
        let data = self.snapshot()?;
        f(&data)
    }
}

/// In-memory storage, for tests and embedding
pub struct MemoryStorage {
    data: RwLock<Dataset>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::with_data(Dataset::new())
    }

    /// Create an in-memory storage seeded with data
    pub fn with_data(data: Dataset) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> PollboxError {
    PollboxError::Storage("storage lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    fn snapshot(&self) -> Result<Dataset> {
        let data = self.data.read().map_err(|_| poisoned())?;
        Ok(data.clone())
    }

    fn transact(&self, change: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()> {
        let mut data = self.data.write().map_err(|_| poisoned())?;
        let mut working = data.clone();
        change(&mut working)?;
        *data = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::{Poll, PollType};
    use crate::store::PollStore;
    use std::sync::Arc;

    fn storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_committed_transaction_is_visible() {
        let storage = storage();
        let poll = Poll::new("Lunch", "", PollType::Multi, None);
        let id = poll.id;

        let returned = storage
            .transaction(|data| {
                data.insert_poll(poll.clone());
                Ok(data.poll_count())
            })
            .unwrap();

        assert_eq!(returned, 1);
        assert!(storage.snapshot().unwrap().get_poll(&id).is_ok());
    }

    #[test]
    fn test_failed_transaction_leaves_no_trace() {
        let storage = storage();
        let poll = Poll::new("Lunch", "", PollType::Multi, None);

        let result: Result<()> = storage.transaction(|data| {
            data.insert_poll(poll.clone());
            Err(PollboxError::Validation("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(storage.snapshot().unwrap().poll_count(), 0);
    }

    #[test]
    fn test_read_uses_snapshot() {
        let storage = storage();
        let count = storage.read(|data| Ok(data.list_polls().len())).unwrap();
        assert_eq!(count, 0);
    }
}
