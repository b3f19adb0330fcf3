//! Shared test helpers for in-crate tests.

use std::sync::Arc;

use crate::config::Config;
use crate::storage::Persistence;
use crate::AppState;

/// Create a test AppState backed by fresh in-memory stores.
pub fn test_state() -> Arc<AppState> {
    let config = Config {
        use_mock_db: true,
        ..Default::default()
    };

    Arc::new(AppState {
        config,
        persistence: Persistence::mock(),
        database: None,
    })
}
