//! Receipt computation and identity.
//!
//! This module is the pure heart of the service: money arithmetic over
//! decimal amounts, receipt-number generation, and the assembly step that
//! turns caller input plus the owning business's VAT rate into a
//! fully-formed, persistable receipt. Everything else (handlers, auth,
//! persistence) is a caller.

pub mod assembly;
pub mod money;
pub mod number;

pub use assembly::{assemble, validate_form_input, NewReceipt, ReceiptDraft, ReceiptError};
pub use money::{compute_totals, round_money, ReceiptTotals};
pub use number::ReceiptNumberKind;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a receipt, as supplied by the caller.
///
/// Validation happens during assembly, not at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReceiptItem {
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}
