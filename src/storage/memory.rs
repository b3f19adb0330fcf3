use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Entity, Repository, StorageError};

/// In-process repository used when no database is available.
///
/// Ids are assigned sequentially from 1. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    rows: DashMap<i32, E>,
    next_id: AtomicI32,
}

impl<E> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, StorageError> {
        let mut rows: Vec<E> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(Entity::id);
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, StorageError> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn insert(&self, new: E::New) -> Result<E, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = E::create(id, new);
        self.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i32, patch: E::Patch) -> Result<bool, StorageError> {
        match self.rows.get_mut(&id) {
            Some(mut row) => {
                row.apply(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        Ok(self.rows.remove(&id).is_some())
    }
}
