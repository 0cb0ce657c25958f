use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, PublicUser,
            RegisterRequest,
        },
        password::{hash_password, verify_password},
        repo::User,
        session::{CurrentUser, RequireAdmin, Session, SESSION_COOKIE},
    },
    error::{created, ApiError, ApiResult, Envelope},
    state::AppState,
    validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/register", post(register))
        .route("/auth/password", post(change_password))
}

fn session_cookie(token: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let email = validate::require_email(Some(&payload.email))?;
    if payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            ApiError::unauthenticated("Invalid email or password")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthenticated("Invalid email or password"));
    }

    Session::purge_expired(&state.db).await?;
    let session = Session::create(&state.db, user.id, state.config.session_ttl_minutes).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    let jar = jar.add(session_cookie(session.token));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            user: PublicUser {
                id: user.id,
                email: user.email,
                role: user.role,
            },
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Value>)> {
    if let Some(token) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<Uuid>().ok())
    {
        Session::delete(&state.db, token).await?;
        info!("session invalidated");
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    let jar = jar.remove(removal);
    Ok((jar, Json(json!({ "success": true }))))
}

#[instrument(skip(user))]
pub async fn me(user: Option<CurrentUser>) -> Json<MeResponse> {
    match user {
        Some(CurrentUser(identity)) => Json(MeResponse {
            logged_in: true,
            user: Some(PublicUser {
                id: identity.id,
                email: identity.email,
                role: identity.role,
            }),
        }),
        None => Json(MeResponse {
            logged_in: false,
            user: None,
        }),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<Envelope<PublicUser>>)> {
    let email = validate::require_email(Some(&payload.email))?;
    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    // Check-then-insert; the unique index is the real guarantee and turns
    // the losing racer into a 409.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &email, &hash, payload.role).await?;

    info!(user_id = %user.id, email = %user.email, created_by = %admin.id, "user registered");
    Ok(created(PublicUser {
        id: user.id,
        email: user.email,
        role: user.role,
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let user = User::find_by_id(&state.db, identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(ApiError::unauthenticated("Current password is incorrect"));
    }

    let hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(json!({ "success": true })))
}
