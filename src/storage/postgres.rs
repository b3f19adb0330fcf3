use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{NewPhoto, NewVideo, PhotoPatch, VideoPatch};
use super::{Entity, Repository, StorageError};

/// Binds an insert payload as one `VALUES` tuple.
pub trait InsertValues {
    /// Column names, in the order `push_values` binds them.
    const COLUMNS: &'static [&'static str];

    fn push_values(self, values: &mut Separated<'_, '_, Postgres, &'static str>);
}

/// Binds the present fields of a patch as `column = $n` assignments.
pub trait UpdateAssignments {
    /// True when no field would be written.
    fn is_empty(&self) -> bool;

    fn push_assignments(self, set: &mut Separated<'_, '_, Postgres, &'static str>);
}

/// PostgreSQL implementation of the repository contract, one table per entity.
#[derive(Debug)]
pub struct PostgresRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> PostgresRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> PostgresRepository<E> {
    async fn exists(&self, id: i32) -> Result<bool, StorageError> {
        let query = format!("SELECT 1 FROM {} WHERE id = $1", E::TABLE);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.is_some())
    }
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::Configuration(_) => StorageError::Configuration(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for PostgresRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, StorageError> {
        let query = format!("SELECT * FROM {} ORDER BY id", E::TABLE);
        sqlx::query_as::<_, E>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, StorageError> {
        let query = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, new: E::New) -> Result<E, StorageError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            E::TABLE,
            <E::New as InsertValues>::COLUMNS.join(", ")
        ));
        {
            let mut values = query.separated(", ");
            new.push_values(&mut values);
        }
        query.push(") RETURNING *");

        query
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(&self, id: i32, patch: E::Patch) -> Result<bool, StorageError> {
        if patch.is_empty() {
            return self.exists(id).await;
        }

        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
        {
            let mut set = query.separated(", ");
            patch.push_assignments(&mut set);
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, StorageError> {
        let query = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Column bindings
// ============================================================================

impl InsertValues for NewPhoto {
    const COLUMNS: &'static [&'static str] =
        &["name", "description", "filename", "views", "is_published"];

    fn push_values(self, values: &mut Separated<'_, '_, Postgres, &'static str>) {
        values
            .push_bind(self.name)
            .push_bind(self.description)
            .push_bind(self.filename)
            .push_bind(self.views)
            .push_bind(self.is_published);
    }
}

impl InsertValues for NewVideo {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "filename",
        "views",
        "is_published",
        "duration",
    ];

    fn push_values(self, values: &mut Separated<'_, '_, Postgres, &'static str>) {
        values
            .push_bind(self.name)
            .push_bind(self.description)
            .push_bind(self.filename)
            .push_bind(self.views)
            .push_bind(self.is_published)
            .push_bind(self.duration);
    }
}

impl UpdateAssignments for PhotoPatch {
    fn is_empty(&self) -> bool {
        PhotoPatch::is_empty(self)
    }

    fn push_assignments(self, set: &mut Separated<'_, '_, Postgres, &'static str>) {
        if let Some(name) = self.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = self.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(filename) = self.filename {
            set.push("filename = ").push_bind_unseparated(filename);
        }
        if let Some(views) = self.views {
            set.push("views = ").push_bind_unseparated(views);
        }
        if let Some(is_published) = self.is_published {
            set.push("is_published = ").push_bind_unseparated(is_published);
        }
    }
}

impl UpdateAssignments for VideoPatch {
    fn is_empty(&self) -> bool {
        VideoPatch::is_empty(self)
    }

    fn push_assignments(self, set: &mut Separated<'_, '_, Postgres, &'static str>) {
        if let Some(name) = self.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = self.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(filename) = self.filename {
            set.push("filename = ").push_bind_unseparated(filename);
        }
        if let Some(views) = self.views {
            set.push("views = ").push_bind_unseparated(views);
        }
        if let Some(is_published) = self.is_published {
            set.push("is_published = ").push_bind_unseparated(is_published);
        }
        if let Some(duration) = self.duration.into_assignment() {
            set.push("duration = ").push_bind_unseparated(duration);
        }
    }
}
