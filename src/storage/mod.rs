pub mod db;
mod memory;
pub mod models;
mod persistence;
mod postgres;
mod tables;

pub use db::Database;
pub use memory::MemoryRepository;
pub use persistence::{initialize, select, Backend, Persistence};
pub use postgres::{InsertValues, PostgresRepository, UpdateAssignments};
pub use tables::*;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage operation timed out: {0}")]
    Timeout(String),
    #[error("Stored data is invalid: {0}")]
    InvalidData(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Invalid connection settings: {0}")]
    Configuration(String),
}

/// A record type exposed as a REST resource and stored in its own table.
pub trait Entity:
    Clone + Serialize + Send + Sync + Unpin + for<'r> sqlx::FromRow<'r, PgRow> + 'static
{
    /// Payload accepted on insert. Identity is never part of it.
    type New: InsertValues + DeserializeOwned + Send + Sync + 'static;
    /// Partial update payload; absent fields keep their stored value.
    type Patch: UpdateAssignments + DeserializeOwned + Send + Sync + 'static;

    /// Display name used in response messages, e.g. "Photo".
    const NAME: &'static str;
    /// URL path segment, e.g. "photos".
    const COLLECTION: &'static str;
    /// SQL table name.
    const TABLE: &'static str;

    fn id(&self) -> i32;

    /// Materialize a stored record from an insert payload and its assigned id.
    fn create(id: i32, new: Self::New) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    /// The repository that backs this entity type within a persistence handle.
    fn repository(persistence: &Persistence) -> &dyn Repository<Self>;
}

/// Storage capability over one entity type. Implemented by the in-memory mock
/// and by the PostgreSQL backend.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Every stored record, ordered by id.
    async fn find_all(&self) -> Result<Vec<E>, StorageError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, StorageError>;

    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, new: E::New) -> Result<E, StorageError>;

    /// Merge `patch` into the record with `id`.
    /// Returns `false` without error when no such record exists.
    async fn update(&self, id: i32, patch: E::Patch) -> Result<bool, StorageError>;

    /// Returns `false` without error when no such record exists.
    async fn delete(&self, id: i32) -> Result<bool, StorageError>;
}
