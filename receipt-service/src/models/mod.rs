pub mod receipt;
pub mod user;

pub use receipt::{ListReceiptsFilter, Receipt, ReceiptItem, ReceiptWithItems};
pub use user::{BusinessProfile, UpdateUserProfile, User, UserResponse};
