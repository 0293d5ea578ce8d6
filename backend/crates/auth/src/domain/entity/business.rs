use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, ids::BusinessId, subscription_plan::SubscriptionPlan,
};

/// Tenant root
#[derive(Debug, Clone)]
pub struct Business {
    pub business_id: BusinessId,
    /// Unique across businesses
    pub name: String,
    pub email: Email,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub plan: SubscriptionPlan,
    pub monthly_invoice_count: i32,
    pub invoice_count_reset_at: DateTime<Utc>,
    pub is_multi_tenant: bool,
    pub brand_color: Option<String>,
    pub logo_url: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Business {
    /// New business on the free plan
    pub fn new(
        name: impl Into<String>,
        email: Email,
        address: Option<String>,
        phone: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            business_id: BusinessId::new(),
            name: name.into().trim().to_string(),
            email,
            address,
            phone,
            plan: SubscriptionPlan::Free,
            monthly_invoice_count: 0,
            invoice_count_reset_at: now,
            is_multi_tenant: false,
            brand_color: None,
            logo_url: None,
            is_deleted: false,
            created_at: now,
        }
    }
}
