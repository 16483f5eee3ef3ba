use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{BusinessProfile, ReceiptWithItems};
use crate::receipts::{NewReceipt, NewReceiptItem};

/// One requested line item. Numeric bounds are enforced by the assembly
/// step, which is the single owner of receipt validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiptItemRequest {
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<ReceiptItemRequest> for NewReceiptItem {
    fn from(item: ReceiptItemRequest) -> Self {
        NewReceiptItem {
            description: item.description,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Payload for creating a receipt. Totals, number and timestamps are never
/// accepted here; the service derives them.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReceiptRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<ReceiptItemRequest>,

    pub payment_method: Option<String>,
}

impl CreateReceiptRequest {
    pub fn into_new_receipt(self) -> NewReceipt {
        NewReceipt {
            customer_name: self.customer_name,
            items: self.items.into_iter().map(Into::into).collect(),
            payment_method: self.payment_method,
        }
    }
}

/// Payload for the anonymous trial calculator. Unlike authenticated
/// creation, the VAT rate comes from the request (no business profile
/// exists) and nothing is persisted.
#[derive(Debug, Deserialize, Validate)]
pub struct TrialReceiptRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<ReceiptItemRequest>,

    pub payment_method: Option<String>,

    pub vat_rate: Option<Decimal>,
}

impl TrialReceiptRequest {
    pub fn into_parts(self) -> (NewReceipt, Option<Decimal>) {
        let vat_rate = self.vat_rate;
        (
            NewReceipt {
                customer_name: self.customer_name,
                items: self.items.into_iter().map(Into::into).collect(),
                payment_method: self.payment_method,
            },
            vat_rate,
        )
    }
}

/// Payload for emailing a shared receipt to a customer.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailReceiptRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Query parameters for listing receipts.
#[derive(Debug, Default, Deserialize)]
pub struct ListReceiptsQuery {
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Response wrapper for a receipt listing.
#[derive(Debug, Serialize)]
pub struct ReceiptsResponse {
    pub receipts: Vec<ReceiptWithItems>,
}

/// A publicly shared receipt together with the issuing business's display
/// profile.
#[derive(Debug, Serialize)]
pub struct SharedReceiptResponse {
    pub receipt: ReceiptWithItems,
    pub business: BusinessProfile,
}
