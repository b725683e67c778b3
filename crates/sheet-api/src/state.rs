use std::sync::Arc;

use sheet_store::Store;

use crate::payments::StripeClient;
use crate::session::SessionKeys;

#[derive(Clone)]
pub struct PaymentSettings {
    pub stripe: Option<StripeClient>,
    pub webhook_secret: Option<String>,
    pub currency: String,
    pub app_url: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            stripe: None,
            webhook_secret: None,
            currency: "eur".into(),
            app_url: "http://localhost:3000".into(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub sessions: SessionKeys,
    pub admin_emails: Arc<Vec<String>>,
    pub payments: Arc<PaymentSettings>,
    pub site_url: String,
}

impl AppState {
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = sheet_store::credentials::normalize_email(email);
        self.admin_emails
            .iter()
            .any(|e| sheet_store::credentials::normalize_email(e) == email)
    }
}
