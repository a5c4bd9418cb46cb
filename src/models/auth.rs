//! Login and password-change payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::AdminIdentity;
use super::validation::strong_password;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginCredentials {
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// `data` of a successful `auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub admin: AdminIdentity,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "confirmation_matches"))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "strong_password"))]
    pub new_password: String,
    pub confirm_password: String,
}

fn confirmation_matches(req: &ChangePasswordRequest) -> Result<(), validator::ValidationError> {
    if req.new_password == req.confirm_password {
        Ok(())
    } else {
        Err(validator::ValidationError::new("password_mismatch")
            .with_message("new password and confirmation differ".into()))
    }
}
