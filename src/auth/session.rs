use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo::Role;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "coursehub_session";

/// One row in the `sessions` table. The token is the opaque cookie value;
/// nothing about the user is stored client-side.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// The authenticated identity held server-side for the duration of a login.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub async fn create(db: &PgPool, user_id: Uuid, ttl_minutes: i64) -> sqlx::Result<Session> {
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes);
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, expires_at)
            VALUES ($1, $2)
            RETURNING token, user_id, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await
    }

    /// Resolves a token to its identity, honouring expiry. Expired rows are
    /// treated exactly like missing ones.
    pub async fn identity(db: &PgPool, token: Uuid) -> sqlx::Result<Option<SessionIdentity>> {
        sqlx::query_as::<_, SessionIdentity>(
            r#"
            SELECT u.id, u.email, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, token: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Opportunistic cleanup of expired rows, called on login.
    pub async fn purge_expired(db: &PgPool) -> sqlx::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(db)
            .await?;
        Ok(res.rows_affected())
    }
}

fn token_from_parts(parts: &Parts) -> Option<Uuid> {
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<Uuid>().ok())
}

/// Extractor for any logged-in user. Rejects with 401 when the cookie is
/// missing, malformed, or the session has expired.
pub struct CurrentUser(pub SessionIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token =
            token_from_parts(parts).ok_or_else(|| ApiError::unauthenticated("Login required"))?;
        let identity = Session::identity(&state.db, token)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                warn!("session token not found or expired");
                ApiError::unauthenticated("Login required")
            })?;
        Ok(CurrentUser(identity))
    }
}

/// Extractor for admin-only routes: 401 without a session, 403 for a
/// non-admin role.
pub struct RequireAdmin(pub SessionIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        if identity.role != Role::Admin {
            warn!(user_id = %identity.id, "admin route rejected for non-admin");
            return Err(ApiError::forbidden("Admin access only"));
        }
        Ok(RequireAdmin(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(value: &str) -> Parts {
        let req = Request::builder()
            .header("cookie", format!("{SESSION_COOKIE}={value}"))
            .body(())
            .unwrap();
        req.into_parts().0
    }

    #[test]
    fn token_parses_from_cookie_header() {
        let token = Uuid::new_v4();
        let parts = parts_with_cookie(&token.to_string());
        assert_eq!(token_from_parts(&parts), Some(token));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let parts = parts_with_cookie("not-a-uuid");
        assert_eq!(token_from_parts(&parts), None);
    }

    #[test]
    fn missing_cookie_yields_none() {
        let req = Request::builder().body(()).unwrap();
        let (parts, _) = req.into_parts();
        assert_eq!(token_from_parts(&parts), None);
    }
}
