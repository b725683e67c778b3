use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Locale;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Paid => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Shipped => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Orders only move forward through the fulfilment pipeline.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub part_id: String,
    pub file_name: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
    /// VAT rate the order was priced at. Older orders lack it.
    #[serde(default)]
    pub vat_rate: Option<f64>,
    pub status: OrderStatus,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Rate to charge at checkout: the stored one, else what the totals imply.
    pub fn charged_vat_rate(&self) -> f64 {
        match self.vat_rate {
            Some(rate) => rate,
            None if self.subtotal > 0.0 => self.vat / self.subtotal,
            None => 0.0,
        }
    }
}

/// Partial order update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub part_id: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub material: String,
    pub thickness: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order_id: String,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_advance_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Shipped.can_advance_to(OrderStatus::Paid));
        assert!(!OrderStatus::Paid.can_advance_to(OrderStatus::Paid));
    }

    #[test]
    fn orders_without_a_stored_rate_fall_back_to_their_totals() {
        let legacy: Order = serde_json::from_value(serde_json::json!({
            "id": "o1", "user_id": "u1", "items": [],
            "subtotal": 100.0, "vat": 19.0, "total": 119.0,
            "status": "pending", "stripe_session_id": null,
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(legacy.vat_rate, None);
        assert!((legacy.charged_vat_rate() - 0.19).abs() < 1e-12);

        let priced = Order { vat_rate: Some(0.21), ..legacy };
        assert_eq!(priced.charged_vat_rate(), 0.21);
    }
}
