pub mod auth;
pub mod receipts;
pub mod users;
