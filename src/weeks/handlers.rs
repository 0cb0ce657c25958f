use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::session::RequireAdmin,
    error::{created, ok, ApiError, ApiResult, Envelope},
    state::AppState,
    validate,
};

use super::dto::{CreateWeek, IdQuery, UpdateWeek, WeekQuery};
use super::repo::{sort_column, Week};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/weeks",
        get(list_or_get).post(create).put(update).delete(remove),
    )
}

#[instrument(skip(state))]
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(q): Query<WeekQuery>,
) -> ApiResult<Response> {
    if q.id.is_some() {
        let id = validate::require_id(q.id.as_deref())?;
        let week = Week::find(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Week not found"))?;
        return Ok(ok(week).into_response());
    }

    let sort_col = sort_column(q.sort.as_deref());
    let order = validate::sort_order(q.order.as_deref(), false);
    let weeks = Week::list(&state.db, q.search.as_deref(), sort_col, order).await?;
    Ok(ok(weeks).into_response())
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateWeek>,
) -> ApiResult<(axum::http::StatusCode, Json<Envelope<Week>>)> {
    let title = validate::require_text("title", payload.title.as_deref())?;
    let start_date = validate::parse_date(
        "startDate",
        payload
            .start_date
            .as_deref()
            .ok_or_else(|| ApiError::validation("startDate is required"))?,
    )?;
    // Description is optional for weeks; the other text fields are not.
    let description = payload
        .description
        .as_deref()
        .map(validate::sanitize)
        .unwrap_or_default();
    let links = validate::sanitize_list(payload.links);

    let week = Week::create(&state.db, &title, start_date, &description, links).await?;

    info!(id = %week.id, created_by = %admin.id, "week created");
    Ok(created(week))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UpdateWeek>,
) -> ApiResult<Json<Envelope<Week>>> {
    let id = validate::require_id(payload.id.as_deref())?;

    let title = payload
        .title
        .as_deref()
        .map(|v| validate::require_text("title", Some(v)))
        .transpose()?;
    let start_date = payload
        .start_date
        .as_deref()
        .map(|v| validate::parse_date("startDate", v))
        .transpose()?;
    let description = payload.description.as_deref().map(validate::sanitize);
    let links = payload.links.map(|l| validate::sanitize_list(Some(l)));

    let week = Week::update(
        &state.db,
        id,
        title.as_deref(),
        start_date,
        description.as_deref(),
        links,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Week not found"))?;

    info!(id = %week.id, "week updated");
    Ok(ok(week))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = validate::require_id(q.id.as_deref())?;
    if !Week::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Week not found"));
    }
    info!(%id, "week deleted");
    Ok(Json(json!({ "success": true })))
}
