use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use receiptr_core::error::AppError;
use rust_decimal::Decimal;

use crate::{
    dtos::receipts::{
        CreateReceiptRequest, EmailReceiptRequest, ListReceiptsQuery, ReceiptsResponse,
        SharedReceiptResponse, TrialReceiptRequest,
    },
    middleware::AuthUser,
    models::ListReceiptsFilter,
    receipts::{assemble, validate_form_input, ReceiptNumberKind},
    services::metrics::{RECEIPTS_TOTAL, RECEIPT_EMAILS_TOTAL},
    utils::ValidatedJson,
    AppState,
};

/// Create a receipt for the authenticated business.
///
/// The VAT rate is read from the owner's profile and injected into the
/// assembly step; totals and number in the request body, if any, are
/// ignored by construction.
pub async fn create_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateReceiptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.0.user_id()?;

    let owner = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let input = req.into_new_receipt();
    validate_form_input(&input)?;

    let draft = assemble(input, owner.vat_rate, ReceiptNumberKind::Business)?;
    let receipt = state.db.create_receipt(user_id, &draft).await?;

    RECEIPTS_TOTAL
        .with_label_values(&[receipt.receipt.payment_method.as_str()])
        .inc();

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List the authenticated business's receipts, newest first.
pub async fn list_receipts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListReceiptsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.0.user_id()?;

    let filter = ListReceiptsFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        date: query.date,
    };

    let receipts = state.db.list_receipts(user_id, &filter).await?;

    Ok(Json(ReceiptsResponse { receipts }))
}

/// Public view of a shared receipt, looked up by receipt number.
pub async fn get_shared_receipt(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = state
        .db
        .find_receipt_by_number(&receipt_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;

    let owner = state
        .db
        .find_user_by_id(receipt.receipt.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;

    Ok(Json(SharedReceiptResponse {
        receipt,
        business: owner.business_profile(),
    }))
}

/// Anonymous trial calculator: assembles a receipt without persisting it.
pub async fn trial_receipt(
    ValidatedJson(req): ValidatedJson<TrialReceiptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (input, vat_rate) = req.into_parts();
    validate_form_input(&input)?;

    let vat_rate = vat_rate.unwrap_or(Decimal::ZERO);
    if vat_rate < Decimal::ZERO || vat_rate > Decimal::from(100) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "VAT rate must be between 0 and 100"
        )));
    }

    let draft = assemble(input, vat_rate, ReceiptNumberKind::TrialFree)?;

    Ok(Json(draft))
}

/// Email a shared-receipt link (with a summary) to a customer.
pub async fn email_receipt(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
    ValidatedJson(req): ValidatedJson<EmailReceiptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = state
        .db
        .find_receipt_by_number(&receipt_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;

    let owner = state
        .db
        .find_user_by_id(receipt.receipt.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;

    let share_url = format!(
        "{}/receipts/{}",
        state.config.public_base_url, receipt.receipt.receipt_number
    );

    let result = state
        .email
        .send_receipt_email(&req.email, &receipt, &owner.business_profile(), &share_url)
        .await;

    let outcome = if result.is_ok() { "success" } else { "failure" };
    RECEIPT_EMAILS_TOTAL.with_label_values(&[outcome]).inc();
    result?;

    Ok(Json(serde_json::json!({
        "message": "Receipt sent successfully"
    })))
}
