use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use receiptr_core::error::AppError;

use crate::{
    dtos::auth::{AuthResponse, LoginRequest, RegisterRequest},
    models::User,
    services::metrics::AUTH_ATTEMPTS_TOTAL,
    utils::{hash_password, verify_password, Password, ValidatedJson},
    AppState,
};

/// Register a new business account.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password_hash = hash_password(&Password::new(req.password))?;

    let user = User::new(
        req.name,
        req.email,
        password_hash,
        req.business_name,
        req.address,
        req.phone,
        req.website,
        req.logo_url,
    );

    let created = state.db.create_user(&user).await.inspect_err(|_| {
        AUTH_ATTEMPTS_TOTAL
            .with_label_values(&["register", "failure"])
            .inc();
    })?;

    AUTH_ATTEMPTS_TOTAL
        .with_label_values(&["register", "success"])
        .inc();

    Ok((StatusCode::CREATED, Json(created.sanitized())))
}

/// Login with email and password, returning a Bearer access token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let failure = || {
        AUTH_ATTEMPTS_TOTAL
            .with_label_values(&["login", "failure"])
            .inc();
        AppError::AuthError(anyhow::anyhow!("Invalid email or password"))
    };

    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(failure)?;

    verify_password(&Password::new(req.password), &user.password_hash).map_err(|_| failure())?;

    let access_token = state
        .jwt
        .generate_access_token(user.user_id, &user.email)?;

    AUTH_ATTEMPTS_TOTAL
        .with_label_values(&["login", "success"])
        .inc();

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: user.sanitized(),
            token: state.jwt.token_response(access_token),
        }),
    ))
}
