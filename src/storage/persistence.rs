use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use super::models::{Photo, Video};
use super::{Database, Entity, MemoryRepository, PostgresRepository, Repository, StorageError};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mock,
    Postgres,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Mock => f.write_str("mock"),
            Backend::Postgres => f.write_str("postgres"),
        }
    }
}

/// The persistence backend chosen at startup, one repository per entity type.
///
/// Cloning is cheap and every clone shares the same backing store.
#[derive(Clone)]
pub struct Persistence {
    backend: Backend,
    photos: Arc<dyn Repository<Photo>>,
    videos: Arc<dyn Repository<Video>>,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Fresh in-memory stores.
    pub fn mock() -> Self {
        Self {
            backend: Backend::Mock,
            photos: Arc::new(MemoryRepository::<Photo>::new()),
            videos: Arc::new(MemoryRepository::<Video>::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres,
            photos: Arc::new(PostgresRepository::<Photo>::new(pool.clone())),
            videos: Arc::new(PostgresRepository::<Video>::new(pool)),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn photos(&self) -> &dyn Repository<Photo> {
        self.photos.as_ref()
    }

    pub fn videos(&self) -> &dyn Repository<Video> {
        self.videos.as_ref()
    }

    pub fn repository<E: Entity>(&self) -> &dyn Repository<E> {
        E::repository(self)
    }
}

/// Choose the backend: mock when configured, PostgreSQL when the connection
/// is live, mock otherwise.
pub fn select(use_mock: bool, database: Option<&Database>) -> Persistence {
    if use_mock {
        info!("Using mock persistence as configured");
        return Persistence::mock();
    }

    match database {
        Some(db) if db.is_initialized() => {
            info!("Using PostgreSQL persistence");
            Persistence::postgres(db.pool().clone())
        }
        _ => {
            warn!("Database not initialized, falling back to mock persistence");
            Persistence::mock()
        }
    }
}

/// Open the database (unless mock mode is configured) and select the backend.
///
/// An unreachable database is not an error: the service falls back to mock.
/// A reachable database whose schema cannot be created is.
pub async fn initialize(
    config: &Config,
) -> Result<(Persistence, Option<Database>), StorageError> {
    let database = if config.use_mock_db {
        None
    } else {
        match Database::connect(&config.database).await {
            Ok(db) => {
                db.ensure_schema().await?;
                Some(db)
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to database");
                None
            }
        }
    };

    let persistence = select(config.use_mock_db, database.as_ref());
    Ok((persistence, database))
}
