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

use super::dto::{CreateResource, IdQuery, ResourceQuery, UpdateResource};
use super::repo::{sort_column, Resource};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/resources",
        get(list_or_get).post(create).put(update).delete(remove),
    )
}

#[instrument(skip(state))]
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(q): Query<ResourceQuery>,
) -> ApiResult<Response> {
    if q.id.is_some() {
        let id = validate::require_id(q.id.as_deref())?;
        let resource = Resource::find(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Resource not found"))?;
        return Ok(ok(resource).into_response());
    }

    let sort_col = sort_column(q.sort.as_deref());
    let order = validate::sort_order(q.order.as_deref(), true);
    let resources = Resource::list(&state.db, q.search.as_deref(), sort_col, order).await?;
    Ok(ok(resources).into_response())
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateResource>,
) -> ApiResult<(axum::http::StatusCode, Json<Envelope<Resource>>)> {
    let title = validate::require_text("title", payload.title.as_deref())?;
    let description = validate::require_text("description", payload.description.as_deref())?;
    let link = validate::require_link(payload.link.as_deref())?;

    let resource = Resource::create(&state.db, &title, &description, &link).await?;

    info!(id = %resource.id, created_by = %admin.id, "resource created");
    Ok(created(resource))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UpdateResource>,
) -> ApiResult<Json<Envelope<Resource>>> {
    let id = validate::require_id(payload.id.as_deref())?;

    let title = payload
        .title
        .as_deref()
        .map(|v| validate::require_text("title", Some(v)))
        .transpose()?;
    let description = payload
        .description
        .as_deref()
        .map(|v| validate::require_text("description", Some(v)))
        .transpose()?;
    let link = payload
        .link
        .as_deref()
        .map(|v| validate::require_link(Some(v)))
        .transpose()?;

    let resource = Resource::update(
        &state.db,
        id,
        title.as_deref(),
        description.as_deref(),
        link.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Resource not found"))?;

    info!(id = %resource.id, "resource updated");
    Ok(ok(resource))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = validate::require_id(q.id.as_deref())?;
    if !Resource::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Resource not found"));
    }
    info!(%id, "resource deleted");
    Ok(Json(json!({ "success": true })))
}
