//! Admin sign-in routes backed by the hosted auth service.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::services::auth::AuthUser;

/// Request body for email/password sign-in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
    pub expires_in: i64,
}

/// Request body for the password-reset email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Sign in and set the session cookies.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let tokens = state
        .auth_client
        .sign_in_with_password(request.email.trim(), &request.password)
        .await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookies(
        &mut headers,
        &tokens.access_token,
        tokens.expires_in,
        &tokens.refresh_token,
    );

    tracing::info!(
        user_id = ?tokens.user.as_ref().map(|u| u.id),
        "Admin signed in"
    );

    Ok((
        headers,
        Json(LoginResponse {
            success: true,
            user: tokens.user,
            expires_in: tokens.expires_in,
        }),
    ))
}

/// Drop the session cookies.
///
/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookies(&mut headers);
    (StatusCode::NO_CONTENT, headers)
}

/// Ask the hosted auth service to send a reset email.
///
/// Always answers 200 so the endpoint cannot be used to probe for accounts.
///
/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Json<MessageResponse> {
    let site_origin = state.config.security.site_origin.trim_end_matches('/');
    let redirect_to = match request.redirect_to.as_deref() {
        Some(path) if path.starts_with('/') => format!("{}{}", site_origin, path),
        Some(url) => url.to_string(),
        None => format!("{}/admin/login", site_origin),
    };

    if let Err(e) = state
        .auth_client
        .send_password_reset(request.email.trim(), Some(&redirect_to))
        .await
    {
        tracing::warn!(error = %e, "Password reset request failed");
    }

    Json(MessageResponse {
        success: true,
        message: "If an account exists for that address, a reset link has been sent".to_string(),
    })
}
