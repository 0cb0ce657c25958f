use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::Role;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for admin user creation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Student
}

/// Request body for changing the current user's password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public part of a user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Response for a successful login: `{success: true, user: {...}}`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Response for GET /api/auth/me.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_defaults_to_student_role() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"s@example.com","password":"longenough"}"#).unwrap();
        assert_eq!(req.role, Role::Student);
    }

    #[test]
    fn login_response_nests_under_user_key() {
        let json = serde_json::to_value(LoginResponse {
            success: true,
            user: PublicUser {
                id: uuid::Uuid::nil(),
                email: "admin@example.com".into(),
                role: Role::Admin,
            },
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["role"], "admin");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn me_response_omits_user_when_anonymous() {
        let json = serde_json::to_value(MeResponse {
            logged_in: false,
            user: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"logged_in": false}));
    }
}
