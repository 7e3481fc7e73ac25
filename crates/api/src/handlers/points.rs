//! Handlers for collection points.
//!
//! Translates query/path/body parameters into repository calls and maps
//! outcomes to status codes. No business logic lives here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ecoleta_core::error::CoreError;
use ecoleta_core::types::DbId;
use ecoleta_db::models::point::{CreatePoint, PointFilter, PointFilterParams};
use ecoleta_db::repositories::PointRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

/// GET /points?city=&uf=&items=1,2,3
///
/// Points in the given location accepting any of the listed items, each
/// returned once. An empty or non-numeric `items` list is rejected before
/// any query runs.
pub async fn list_points(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PointFilterParams>,
) -> AppResult<impl IntoResponse> {
    let filter = PointFilter::try_from(params)?;

    let points = PointRepo::filter(&state.pool, &filter).await?;

    Ok(Json(points))
}

/// GET /points/{id}
///
/// A point and the titles of the items it accepts.
pub async fn get_point(
    State(state): State<AppState>,
    ApiPath(point_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = PointRepo::find_with_items(&state.pool, point_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Point",
            id: point_id,
        }))?;

    Ok(Json(detail))
}

/// POST /points
///
/// Register a point and its accepted items atomically.
pub async fn create_point(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreatePoint>,
) -> AppResult<impl IntoResponse> {
    let point = PointRepo::create(&state.pool, &input).await?;

    tracing::info!(
        point_id = point.id,
        city = %point.city,
        uf = %point.uf,
        item_count = input.items.len(),
        "Point created",
    );

    Ok((StatusCode::CREATED, Json(point)))
}
