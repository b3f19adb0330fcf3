use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use super::storage_error;
use crate::api::response::{ApiError, AppJson, EntityId, MessageBody};
use crate::storage::Entity;
use crate::AppState;

// ============================================================================
// Handlers
// ============================================================================

pub async fn list<E: Entity>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<E>>, ApiError> {
    let items = state
        .persistence
        .repository::<E>()
        .find_all()
        .await
        .map_err(storage_error(format!("Failed to retrieve {}", E::COLLECTION)))?;

    Ok(Json(items))
}

pub async fn get_one<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<E>, ApiError> {
    let item = state
        .persistence
        .repository::<E>()
        .find_by_id(id)
        .await
        .map_err(storage_error(format!("Failed to retrieve {}", singular::<E>())))?
        .ok_or_else(not_found::<E>)?;

    Ok(Json(item))
}

pub async fn create<E: Entity>(
    State(state): State<Arc<AppState>>,
    AppJson(new): AppJson<E::New>,
) -> Result<(StatusCode, Json<E>), ApiError> {
    let item = state
        .persistence
        .repository::<E>()
        .insert(new)
        .await
        .map_err(storage_error(format!("Failed to create {}", singular::<E>())))?;

    tracing::debug!(id = item.id(), resource = E::COLLECTION, "Created record");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    AppJson(patch): AppJson<E::Patch>,
) -> Result<Json<MessageBody>, ApiError> {
    let updated = state
        .persistence
        .repository::<E>()
        .update(id, patch)
        .await
        .map_err(storage_error(format!("Failed to update {}", singular::<E>())))?;

    if !updated {
        return Err(not_found::<E>());
    }

    tracing::debug!(id, resource = E::COLLECTION, "Updated record");
    Ok(MessageBody::new(format!("{} updated successfully.", E::NAME)))
}

pub async fn remove<E: Entity>(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<MessageBody>, ApiError> {
    let deleted = state
        .persistence
        .repository::<E>()
        .delete(id)
        .await
        .map_err(storage_error(format!("Failed to delete {}", singular::<E>())))?;

    if !deleted {
        return Err(not_found::<E>());
    }

    tracing::debug!(id, resource = E::COLLECTION, "Deleted record");
    Ok(MessageBody::new(format!("{} deleted successfully.", E::NAME)))
}

// ============================================================================
// Helpers
// ============================================================================

fn singular<E: Entity>() -> String {
    E::NAME.to_lowercase()
}

fn not_found<E: Entity>() -> ApiError {
    ApiError::not_found(format!("{} not found", E::NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{NewPhoto, Photo, PhotoPatch, Video};
    use crate::testutil::test_state;

    fn new_photo() -> NewPhoto {
        NewPhoto {
            name: "Sunset".to_string(),
            description: "Beach at dusk".to_string(),
            filename: "sunset.jpg".to_string(),
            views: 0,
            is_published: true,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let state = test_state();

        let (status, Json(created)) =
            create::<Photo>(State(Arc::clone(&state)), AppJson(new_photo()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(found) = get_one::<Photo>(State(state), EntityId(created.id))
            .await
            .unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let err = get_one::<Video>(State(test_state()), EntityId(5))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::not_found("Video not found"));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let err = update::<Photo>(
            State(test_state()),
            EntityId(5),
            AppJson(PhotoPatch::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ApiError::not_found("Photo not found"));
    }

    #[tokio::test]
    async fn remove_reports_message() {
        let state = test_state();
        let (_, Json(created)) = create::<Photo>(State(Arc::clone(&state)), AppJson(new_photo()))
            .await
            .unwrap();

        let Json(body) = remove::<Photo>(State(Arc::clone(&state)), EntityId(created.id))
            .await
            .unwrap();
        assert_eq!(body.message, "Photo deleted successfully.");

        let Json(items) = list::<Photo>(State(state)).await.unwrap();
        assert!(items.is_empty());
    }
}
