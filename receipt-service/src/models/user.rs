//! User model - one row per registered business owner.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Business account. The `vat_rate` and `selected_template` fields drive
/// receipt creation and rendering for everything this account owns.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub logo_url: String,
    pub vat_rate: Decimal,
    pub selected_template: String,
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Create a new account with profile defaults applied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        business_name: String,
        address: String,
        phone: String,
        website: Option<String>,
        logo_url: Option<String>,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            business_name,
            address,
            phone,
            website: website.unwrap_or_default(),
            logo_url: logo_url.unwrap_or_default(),
            vat_rate: Decimal::ZERO,
            selected_template: "classic".to_string(),
            created_utc: Utc::now(),
        }
    }

    /// Convert to a response safe to hand to API callers (no hash).
    pub fn sanitized(&self) -> UserResponse {
        UserResponse::from(self.clone())
    }

    /// The public face of this business, shown on shared receipts.
    pub fn business_profile(&self) -> BusinessProfile {
        BusinessProfile {
            business_name: self.business_name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            logo_url: self.logo_url.clone(),
            vat_rate: self.vat_rate,
            selected_template: self.selected_template.clone(),
        }
    }
}

/// User response for the API (without sensitive fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub logo_url: String,
    pub vat_rate: Decimal,
    pub selected_template: String,
    pub created_utc: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            business_name: u.business_name,
            address: u.address,
            phone: u.phone,
            website: u.website,
            logo_url: u.logo_url,
            vat_rate: u.vat_rate,
            selected_template: u.selected_template,
            created_utc: u.created_utc,
        }
    }
}

/// Input for updating a business profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserProfile {
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub vat_rate: Option<Decimal>,
}

/// Business display profile attached to publicly shared receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub logo_url: String,
    pub vat_rate: Decimal,
    pub selected_template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_profile_defaults() {
        let user = User::new(
            "Ada".into(),
            "ada@example.com".into(),
            "$argon2id$fake".into(),
            "Ada's Shop".into(),
            "1 Lovelace Way".into(),
            "+2348000000000".into(),
            None,
            None,
        );

        assert_eq!(user.website, "");
        assert_eq!(user.logo_url, "");
        assert_eq!(user.vat_rate, Decimal::ZERO);
        assert_eq!(user.selected_template, "classic");
    }

    #[test]
    fn sanitized_response_omits_password_hash() {
        let user = User::new(
            "Ada".into(),
            "ada@example.com".into(),
            "$argon2id$fake".into(),
            "Ada's Shop".into(),
            "1 Lovelace Way".into(),
            "+2348000000000".into(),
            Some("https://ada.example".into()),
            None,
        );

        let json = serde_json::to_value(user.sanitized()).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["website"], "https://ada.example");
    }
}
