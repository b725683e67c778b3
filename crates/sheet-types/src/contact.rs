use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactRequest {
    pub reason: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub order_reference: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: String,
    pub reason: String,
    pub name: String,
    pub email: String,
    pub order_reference: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Human label for a contact reason code.
pub fn contact_reason_label(reason: &str) -> &str {
    match reason {
        "general" => "General Inquiry",
        "quote" => "Quote Request",
        "orderSupport" => "Order Support",
        "technical" => "Technical Issue",
        "other" => "Other",
        other => other,
    }
}
