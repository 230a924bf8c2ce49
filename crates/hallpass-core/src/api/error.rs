//! Error taxonomy for the authentication exchanges.
//!
//! Messages are written for direct presentation: the session logs each
//! failure once and hands the error back to the caller unchanged.

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::token::DecodeError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// 401 from the credential exchange.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Any other non-success status from the credential exchange.
    #[error("Login failed")]
    LoginFailed,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Account already exists")]
    AccountExists,

    #[error("Password does not meet requirements")]
    PasswordPolicy,

    /// Registration 400 without a recognizable field error.
    #[error("{}", .detail.as_deref().unwrap_or("Registration failed"))]
    Registration { detail: Option<String> },

    /// 5xx from the registration exchange.
    #[error("Registration failed, please try again")]
    ServerError,

    /// Client-side confirmation check; never sent over the wire.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The exchange succeeded but the returned token cannot be decoded.
    #[error("Received an unusable access token: {0}")]
    InvalidToken(#[from] DecodeError),

    /// A login or registration call is already in flight on this session.
    #[error("An authentication request is already in progress")]
    AlreadyPending,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuthError {
    /// Map a non-success credential-exchange status to an error.
    pub(crate) fn from_login_status(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            AuthError::InvalidCredentials
        } else {
            AuthError::LoginFailed
        }
    }

    /// Map a non-success registration status to an error, inspecting a 400
    /// body for field-specific validation failures.
    pub(crate) fn from_register_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => Self::from_register_body(body),
            409 => AuthError::AccountExists,
            422 => AuthError::PasswordPolicy,
            500..=599 => AuthError::ServerError,
            _ => AuthError::Registration { detail: None },
        }
    }

    /// A 400 body carries per-field errors (`username`, `email`) or a
    /// free-form `detail` message.
    fn from_register_body(body: &str) -> Self {
        let Ok(fields) = serde_json::from_str::<serde_json::Value>(body) else {
            return AuthError::Registration { detail: None };
        };
        if fields.get("username").is_some() {
            return AuthError::UsernameTaken;
        }
        if fields.get("email").is_some() {
            return AuthError::EmailInUse;
        }
        let detail = fields
            .get("detail")
            .and_then(|d| d.as_str())
            .map(str::to_string);
        AuthError::Registration { detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_401_is_invalid_credentials() {
        assert!(matches!(
            AuthError::from_login_status(StatusCode::UNAUTHORIZED),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn login_other_statuses_are_generic() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::FORBIDDEN,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert!(matches!(
                AuthError::from_login_status(status),
                AuthError::LoginFailed
            ));
        }
    }

    #[test]
    fn register_400_with_username_field() {
        let err = AuthError::from_register_status(
            StatusCode::BAD_REQUEST,
            r#"{"username": ["A user with that username already exists."]}"#,
        );
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn register_400_with_email_field() {
        let err = AuthError::from_register_status(
            StatusCode::BAD_REQUEST,
            r#"{"email": ["Enter a valid email address."]}"#,
        );
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[test]
    fn register_400_with_detail_message() {
        let err = AuthError::from_register_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Registration is closed"}"#,
        );
        assert_eq!(err.to_string(), "Registration is closed");
    }

    #[test]
    fn register_400_with_unparseable_body_is_generic() {
        let err = AuthError::from_register_status(StatusCode::BAD_REQUEST, "<html>");
        assert_eq!(err.to_string(), "Registration failed");
    }

    #[test]
    fn register_status_table() {
        assert!(matches!(
            AuthError::from_register_status(StatusCode::CONFLICT, ""),
            AuthError::AccountExists
        ));
        assert!(matches!(
            AuthError::from_register_status(StatusCode::UNPROCESSABLE_ENTITY, ""),
            AuthError::PasswordPolicy
        ));
        assert!(matches!(
            AuthError::from_register_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            AuthError::ServerError
        ));
        assert!(matches!(
            AuthError::from_register_status(StatusCode::BAD_GATEWAY, ""),
            AuthError::ServerError
        ));
        assert!(matches!(
            AuthError::from_register_status(StatusCode::IM_A_TEAPOT, ""),
            AuthError::Registration { detail: None }
        ));
    }
}
