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

use super::dto::{AssignmentQuery, CreateAssignment, IdQuery, UpdateAssignment};
use super::repo::{sort_column, Assignment};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/assignments",
        get(list_or_get).post(create).put(update).delete(remove),
    )
}

#[instrument(skip(state))]
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(q): Query<AssignmentQuery>,
) -> ApiResult<Response> {
    if q.id.is_some() {
        let id = validate::require_id(q.id.as_deref())?;
        let assignment = Assignment::find(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Assignment not found"))?;
        return Ok(ok(assignment).into_response());
    }

    let sort_col = sort_column(q.sort.as_deref());
    let order = validate::sort_order(q.order.as_deref(), true);
    let assignments = Assignment::list(&state.db, q.search.as_deref(), sort_col, order).await?;
    Ok(ok(assignments).into_response())
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateAssignment>,
) -> ApiResult<(axum::http::StatusCode, Json<Envelope<Assignment>>)> {
    let title = validate::require_text("title", payload.title.as_deref())?;
    let description = validate::require_text("description", payload.description.as_deref())?;
    let due_date = validate::parse_date(
        "due_date",
        payload
            .due_date
            .as_deref()
            .ok_or_else(|| ApiError::validation("due_date is required"))?,
    )?;
    let files = validate::sanitize_list(payload.files);

    let assignment = Assignment::create(&state.db, &title, &description, due_date, files).await?;

    info!(id = %assignment.id, created_by = %admin.id, "assignment created");
    Ok(created(assignment))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UpdateAssignment>,
) -> ApiResult<Json<Envelope<Assignment>>> {
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
    let due_date = payload
        .due_date
        .as_deref()
        .map(|v| validate::parse_date("due_date", v))
        .transpose()?;
    let files = payload.files.map(|f| validate::sanitize_list(Some(f)));

    let assignment = Assignment::update(
        &state.db,
        id,
        title.as_deref(),
        description.as_deref(),
        due_date,
        files,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    info!(id = %assignment.id, "assignment updated");
    Ok(ok(assignment))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = validate::require_id(q.id.as_deref())?;
    if !Assignment::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Assignment not found"));
    }
    info!(%id, "assignment deleted");
    Ok(Json(json!({ "success": true })))
}
