mod health;
mod resources;

use crate::api::response::ApiError;
use crate::storage::StorageError;

pub use health::health;
pub use resources::{create, get_one, list, remove, update};

/// Log a storage fault and hide it behind a generic client message.
fn storage_error(context: String) -> impl FnOnce(StorageError) -> ApiError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        ApiError::storage(context)
    }
}
