//! Receipt record assembly.
//!
//! Validates caller-supplied fields, derives the totals and the receipt
//! number, and produces a draft ready for persistence. This is the only
//! place receipt invariants are enforced: the money arithmetic and number
//! generation it calls never fail.

use chrono::{DateTime, Utc};
use receiptr_core::error::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::money::{compute_totals, ReceiptTotals};
use super::number::{self, ReceiptNumberKind};
use super::NewReceiptItem;

/// Caller input for a new receipt. Totals, number and timestamp are never
/// part of this type: they are derived during assembly and cannot be
/// supplied from outside.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub customer_name: String,
    pub items: Vec<NewReceiptItem>,
    pub payment_method: Option<String>,
}

/// A fully-formed receipt awaiting its single persistence write.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDraft {
    pub receipt_number: String,
    pub customer_name: String,
    pub items: Vec<NewReceiptItem>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
    pub payment_method: String,
    pub created_utc: DateTime<Utc>,
}

/// Validation failures raised while assembling a receipt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("Customer name is required")]
    MissingCustomerName,
    #[error("At least one line item is required")]
    EmptyItems,
    #[error("Line item {index}: description is required")]
    MissingDescription { index: usize },
    #[error("Line item {index}: quantity must be at least 1")]
    QuantityTooSmall { index: usize },
    #[error("Line item {index}: price must not be negative")]
    NegativePrice { index: usize },
    #[error("Line item {index}: price must be greater than zero")]
    ZeroPrice { index: usize },
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        AppError::BadRequest(anyhow::anyhow!(err))
    }
}

/// Enforces the creation-form bounds on user-entered receipts: a zero price
/// is rejected in addition to the schema bounds checked by [`assemble`].
pub fn validate_form_input(input: &NewReceipt) -> Result<(), ReceiptError> {
    for (index, item) in input.items.iter().enumerate() {
        if item.price == Decimal::ZERO {
            return Err(ReceiptError::ZeroPrice { index });
        }
    }
    Ok(())
}

/// Assembles a persistable receipt from caller input and the owning
/// business's VAT rate.
///
/// The VAT rate is injected by the caller from the business profile; it is
/// never read from ambient state and never taken from the request. Enforced
/// bounds are the stored-schema ones: non-empty trimmed customer name and
/// descriptions, quantity >= 1, price >= 0, at least one item.
pub fn assemble(
    input: NewReceipt,
    vat_rate: Decimal,
    kind: ReceiptNumberKind,
) -> Result<ReceiptDraft, ReceiptError> {
    let customer_name = input.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(ReceiptError::MissingCustomerName);
    }
    if input.items.is_empty() {
        return Err(ReceiptError::EmptyItems);
    }
    for (index, item) in input.items.iter().enumerate() {
        if item.description.trim().is_empty() {
            return Err(ReceiptError::MissingDescription { index });
        }
        if item.quantity < 1 {
            return Err(ReceiptError::QuantityTooSmall { index });
        }
        if item.price < Decimal::ZERO {
            return Err(ReceiptError::NegativePrice { index });
        }
    }

    let ReceiptTotals {
        subtotal,
        vat,
        total,
    } = compute_totals(&input.items, vat_rate);

    let payment_method = input
        .payment_method
        .filter(|method| !method.trim().is_empty())
        .unwrap_or_else(|| "Cash".to_string());

    let now = Utc::now();

    Ok(ReceiptDraft {
        receipt_number: number::format_at(kind, now.timestamp_millis()),
        customer_name,
        items: input.items,
        subtotal,
        vat,
        total,
        payment_method,
        created_utc: now,
    })
}
