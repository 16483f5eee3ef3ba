use axum::{extract::State, response::IntoResponse, Json};
use receiptr_core::error::AppError;
use rust_decimal::Decimal;

use crate::{
    dtos::users::{UpdateProfileRequest, UpdateTemplateRequest},
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

/// Current account's profile.
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.0.user_id()?;

    let user = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(user.sanitized()))
}

/// Partial update of the business profile, including the VAT rate applied
/// to future receipts.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.0.user_id()?;

    if let Some(rate) = req.vat_rate {
        if rate < Decimal::ZERO || rate > Decimal::from(100) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "VAT rate must be between 0 and 100"
            )));
        }
    }

    let updated = state
        .db
        .update_profile(user_id, &req.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(updated.sanitized()))
}

/// Switch the receipt template used when rendering this account's
/// receipts.
pub async fn update_template(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.0.user_id()?;

    let updated = state
        .db
        .update_template(user_id, &req.selected_template)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(updated.sanitized()))
}
