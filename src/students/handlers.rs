use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::{password::hash_password, session::RequireAdmin},
    error::{created, ok, ApiError, ApiResult, Envelope},
    state::AppState,
    validate,
};

use super::dto::{CreateStudent, IdQuery, StudentQuery, UpdateStudent};
use super::repo::{sort_column, Student};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/students",
        get(list_or_get).post(create).put(update).delete(remove),
    )
}

#[instrument(skip(state))]
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(q): Query<StudentQuery>,
) -> ApiResult<Response> {
    if q.id.is_some() {
        let id = validate::require_id(q.id.as_deref())?;
        let student = Student::find(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student not found"))?;
        return Ok(ok(student).into_response());
    }

    let sort_col = sort_column(q.sort.as_deref());
    let order = validate::sort_order(q.order.as_deref(), false);
    let students = Student::list(&state.db, q.search.as_deref(), sort_col, order).await?;
    Ok(ok(students).into_response())
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateStudent>,
) -> ApiResult<(axum::http::StatusCode, Json<Envelope<Student>>)> {
    let student_id = validate::require_text("student_id", payload.student_id.as_deref())?;
    let name = validate::require_text("name", payload.name.as_deref())?;
    let email = validate::require_email(payload.email.as_deref())?;
    let password = payload.password.unwrap_or_default();
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if Student::email_taken(&state.db, &email, None).await? {
        return Err(ApiError::conflict("Email already registered"));
    }
    if Student::student_id_taken(&state.db, &student_id, None).await? {
        return Err(ApiError::conflict("Student ID already registered"));
    }

    let hash = hash_password(&password)?;
    let student = Student::create(&state.db, &student_id, &name, &email, &hash).await?;

    info!(id = %student.id, student_id = %student.student_id, created_by = %admin.id, "student created");
    Ok(created(student))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UpdateStudent>,
) -> ApiResult<Json<Envelope<Student>>> {
    let id = validate::require_id(payload.id.as_deref())?;

    let student_id = payload
        .student_id
        .as_deref()
        .map(|v| validate::require_text("student_id", Some(v)))
        .transpose()?;
    let name = payload
        .name
        .as_deref()
        .map(|v| validate::require_text("name", Some(v)))
        .transpose()?;
    let email = payload
        .email
        .as_deref()
        .map(|v| validate::require_email(Some(v)))
        .transpose()?;
    let password_hash = payload
        .password
        .as_deref()
        .map(|p| {
            if p.len() < 8 {
                Err(ApiError::validation(
                    "Password must be at least 8 characters",
                ))
            } else {
                hash_password(p).map_err(ApiError::from)
            }
        })
        .transpose()?;

    if let Some(email) = email.as_deref() {
        if Student::email_taken(&state.db, email, Some(id)).await? {
            return Err(ApiError::conflict("Email already registered"));
        }
    }
    if let Some(student_id) = student_id.as_deref() {
        if Student::student_id_taken(&state.db, student_id, Some(id)).await? {
            return Err(ApiError::conflict("Student ID already registered"));
        }
    }

    let student = Student::update(
        &state.db,
        id,
        student_id.as_deref(),
        name.as_deref(),
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Student not found"))?;

    info!(id = %student.id, "student updated");
    Ok(ok(student))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = validate::require_id(q.id.as_deref())?;
    if !Student::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Student not found"));
    }
    info!(%id, "student deleted");
    Ok(Json(json!({ "success": true })))
}
