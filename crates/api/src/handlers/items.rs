//! Handlers for the item catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ecoleta_db::models::item::ItemView;
use ecoleta_db::repositories::ItemRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /items
///
/// List every item with its image resolved against the uploads base URL.
pub async fn list_items(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ItemRepo::list(&state.pool).await?;

    let views: Vec<ItemView> = items
        .into_iter()
        .map(|item| item.into_view(&state.config.uploads_base_url))
        .collect();

    Ok(Json(views))
}
