use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::UpdateUserProfile;

/// Partial business-profile update. Absent fields are left unchanged; the
/// VAT-rate bound is checked by the handler since it is a domain rule, not
/// a shape rule.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Business name must not be empty"))]
    pub business_name: Option<String>,

    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,

    #[validate(length(min = 1, message = "Phone must not be empty"))]
    pub phone: Option<String>,

    pub website: Option<String>,

    pub logo_url: Option<String>,

    pub vat_rate: Option<Decimal>,
}

impl From<UpdateProfileRequest> for UpdateUserProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        UpdateUserProfile {
            name: req.name,
            business_name: req.business_name,
            address: req.address,
            phone: req.phone,
            website: req.website,
            logo_url: req.logo_url,
            vat_rate: req.vat_rate,
        }
    }
}

/// Payload for switching the receipt template.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, message = "Template is required"))]
    pub selected_template: String,
}
