use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::session::{CurrentUser, RequireAdmin, SessionIdentity},
    error::{created, ok, ApiError, ApiResult, Envelope},
    state::AppState,
    validate,
};

use super::dto::{CommentListQuery, CreateComment, IdQuery};
use super::repo::{Comment, ParentKind};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/assignments/comments",
            get(list_assignment).post(create_assignment).delete(remove_assignment),
        )
        .route(
            "/resources/comments",
            get(list_resource).post(create_resource).delete(remove_resource),
        )
        .route(
            "/weeks/comments",
            get(list_week).post(create_week).delete(remove_week),
        )
}

// One thin wrapper per route; the logic lives in the kind-parameterized
// functions below.

async fn list_assignment(
    state: State<AppState>,
    q: Query<CommentListQuery>,
) -> ApiResult<Json<Envelope<Vec<Comment>>>> {
    list(state, q, ParentKind::Assignment).await
}
async fn list_resource(
    state: State<AppState>,
    q: Query<CommentListQuery>,
) -> ApiResult<Json<Envelope<Vec<Comment>>>> {
    list(state, q, ParentKind::Resource).await
}
async fn list_week(
    state: State<AppState>,
    q: Query<CommentListQuery>,
) -> ApiResult<Json<Envelope<Vec<Comment>>>> {
    list(state, q, ParentKind::Week).await
}

async fn create_assignment(
    state: State<AppState>,
    user: CurrentUser,
    payload: Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<Envelope<Comment>>)> {
    create(state, user, payload, ParentKind::Assignment).await
}
async fn create_resource(
    state: State<AppState>,
    user: CurrentUser,
    payload: Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<Envelope<Comment>>)> {
    create(state, user, payload, ParentKind::Resource).await
}
async fn create_week(
    state: State<AppState>,
    user: CurrentUser,
    payload: Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<Envelope<Comment>>)> {
    create(state, user, payload, ParentKind::Week).await
}

async fn remove_assignment(
    state: State<AppState>,
    admin: RequireAdmin,
    q: Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    remove(state, admin, q, ParentKind::Assignment).await
}
async fn remove_resource(
    state: State<AppState>,
    admin: RequireAdmin,
    q: Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    remove(state, admin, q, ParentKind::Resource).await
}
async fn remove_week(
    state: State<AppState>,
    admin: RequireAdmin,
    q: Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    remove(state, admin, q, ParentKind::Week).await
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(q): Query<CommentListQuery>,
    kind: ParentKind,
) -> ApiResult<Json<Envelope<Vec<Comment>>>> {
    let parent_id = validate::require_id(q.parent_id.as_deref())
        .map_err(|_| ApiError::validation("parent_id is required"))?;
    let comments = Comment::list_by_parent(&state.db, kind, parent_id).await?;
    Ok(ok(comments))
}

#[instrument(skip(state, payload, identity))]
async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<CreateComment>,
    kind: ParentKind,
) -> ApiResult<(StatusCode, Json<Envelope<Comment>>)> {
    let parent_id = validate::require_id(payload.parent_id.as_deref())
        .map_err(|_| ApiError::validation("parent_id is required"))?;
    let text = validate::require_text("text", payload.text.as_deref())?;
    let author = author_or_session(payload.author.as_deref(), &identity);

    if !Comment::parent_exists(&state.db, kind, parent_id).await? {
        return Err(ApiError::not_found(format!("{} not found", kind.label())));
    }

    let comment = Comment::create(&state.db, kind, parent_id, &author, &text).await?;
    info!(id = %comment.id, %parent_id, "comment created");
    Ok(created(comment))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<IdQuery>,
    kind: ParentKind,
) -> ApiResult<Json<serde_json::Value>> {
    let id = validate::require_id(q.id.as_deref())?;
    if !Comment::delete(&state.db, kind, id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }
    info!(%id, "comment deleted");
    Ok(Json(json!({ "success": true })))
}

/// A blank author falls back to the session email; the author field is
/// display-only and not verified further.
fn author_or_session(author: Option<&str>, identity: &SessionIdentity) -> String {
    let sanitized = author.map(validate::sanitize).unwrap_or_default();
    if sanitized.is_empty() {
        identity.email.clone()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::Role;
    use uuid::Uuid;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            id: Uuid::new_v4(),
            email: "student@example.com".into(),
            role: Role::Student,
        }
    }

    #[test]
    fn blank_author_falls_back_to_session_email() {
        let id = identity();
        assert_eq!(author_or_session(None, &id), "student@example.com");
        assert_eq!(author_or_session(Some("   "), &id), "student@example.com");
    }

    #[test]
    fn author_is_sanitized() {
        let id = identity();
        assert_eq!(author_or_session(Some(" <b>Sara</b> "), &id), "&lt;b&gt;Sara&lt;/b&gt;");
    }
}
