//! persistence-service - REST backend for photos and videos
//!
//! This crate provides CRUD endpoints over two resource types with:
//! - A persistence layer that is either PostgreSQL-backed or in-memory
//! - Backend selection made once at startup, with fallback to in-memory
//!   storage when the database is unreachable
//! - A health endpoint reporting database connectivity

pub mod api;
pub mod config;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use config::Config;
use storage::{Database, Persistence};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub persistence: Persistence,
    /// Present only when a database connection was opened at startup.
    pub database: Option<Database>,
}

impl AppState {
    pub fn db_connected(&self) -> bool {
        self.database
            .as_ref()
            .is_some_and(|db| db.is_initialized())
    }
}
