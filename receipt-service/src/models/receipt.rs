//! Receipt models: the persisted header, its line items, and list filters.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted receipt header. Created once, read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receipt {
    pub receipt_id: Uuid,
    pub user_id: Uuid,
    pub receipt_number: String,
    pub customer_name: String,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Persisted line item, ordered by `position` within its receipt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReceiptItem {
    pub receipt_item_id: Uuid,
    pub receipt_id: Uuid,
    pub position: i32,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// A receipt with its line items inlined, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptWithItems {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

/// Filter parameters for listing an account's receipts.
///
/// `search` matches customer name or receipt number (case-insensitive
/// substring); `date` restricts creation time to that calendar day.
#[derive(Debug, Clone, Default)]
pub struct ListReceiptsFilter {
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
}
