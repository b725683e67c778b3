//! Stripe Checkout sessions and webhook signature checks.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use sheet_engine::pricing::gross_unit_amount_cents;
use sheet_types::{Locale, Order};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Signed events older than this are refused.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payments are not configured")]
    NotConfigured,
    #[error("payment request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payment provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature header")]
    Malformed,
    #[error("signature timestamp outside tolerance")]
    Expired,
    #[error("signature mismatch")]
    Mismatch,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Clone)]
pub struct StripeClient {
    secret_key: String,
    api_base: String,
    http: reqwest::Client,
}

impl StripeClient {
    pub fn new(secretKey: &str) -> Self {
        Self::with_base(secretKey, STRIPE_API_BASE)
    }

    pub fn with_base(secretKey: &str, apiBase: &str) -> Self {
        Self {
            secret_key: secretKey.to_string(),
            api_base: apiBase.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Opens a hosted checkout for `order`, one line item per part at its gross unit price.
    pub async fn create_checkout_session(
        &self,
        order: &Order,
        currency: &str,
        appUrl: &str,
        locale: Locale,
    ) -> Result<CheckoutSession, PaymentError> {
        let form = checkout_form(order, currency, appUrl, locale);

        let resp = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(PaymentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let session: CheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::InvalidResponse("session has no url".into()))?;
        tracing::info!("checkout session {} opened for order {}", session.id, order.id);
        Ok(CheckoutSession { id: session.id, url })
    }
}

/// Form fields for `POST /v1/checkout/sessions`, charged at the order's own VAT rate.
pub fn checkout_form(order: &Order, currency: &str, appUrl: &str, locale: Locale) -> Vec<(String, String)> {
    let appUrl = appUrl.trim_end_matches('/');
    let vatRate = order.charged_vat_rate();
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("metadata[orderId]".to_string(), order.id.clone()),
        (
            "success_url".to_string(),
            format!("{appUrl}/{locale}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}"),
        ),
        ("cancel_url".to_string(), format!("{appUrl}/{locale}/checkout")),
    ];
    for (i, item) in order.items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        form.push((format!("{prefix}[price_data][currency]"), currency.to_lowercase()));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            gross_unit_amount_cents(item.price_per_unit, vatRate).to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.file_name.clone(),
        ));
    }
    form
}

fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).unwrap_or_else(|_| unreachable!());
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Checks a `Stripe-Signature: t=<unix>,v1=<hex>` header against the raw body.
/// Any one matching `v1` entry is enough.
pub fn verify_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }
    if (now.timestamp() - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::Expired);
    }

    let matched = signatures
        .iter()
        .any(|sig| sign(secret, timestamp, payload).verify_slice(sig).is_ok());
    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Header value a sender holding `secret` would attach; used by tests and local tooling.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mac = sign(secret, timestamp, payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_types::{OrderItem, OrderStatus};

    #[test]
    fn accepts_matching_signature() {
        let now = Utc::now();
        let body = br#"{"type":"ping"}"#;
        let header = signature_header(body, "whsec_test", now.timestamp());
        assert_eq!(verify_signature(&header, body, "whsec_test", now), Ok(()));
    }

    #[test]
    fn rejects_bad_signatures() {
        let now = Utc::now();
        let body = br#"{"type":"ping"}"#;
        let header = signature_header(body, "other", now.timestamp());
        assert_eq!(
            verify_signature(&header, body, "whsec_test", now),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature("v1=abcd", body, "whsec_test", now),
            Err(SignatureError::Malformed)
        );

        let stale = signature_header(body, "whsec_test", now.timestamp() - 3600);
        assert_eq!(
            verify_signature(&stale, body, "whsec_test", now),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn checkout_form_carries_gross_cents_and_order_id() {
        let order = Order {
            id: "o1".into(),
            user_id: "u1".into(),
            items: vec![OrderItem {
                part_id: "p1".into(),
                file_name: "bracket.dxf".into(),
                quantity: 3,
                price_per_unit: 10.0,
                total: 30.0,
            }],
            subtotal: 30.0,
            vat: 6.3,
            total: 36.3,
            vat_rate: Some(0.21),
            status: OrderStatus::Pending,
            stripe_session_id: None,
            created_at: Utc::now(),
        };
        let form = checkout_form(&order, "EUR", "https://sheetmates.test/", Locale::Fr);
        let get = |k: &str| form.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());

        assert_eq!(get("metadata[orderId]"), Some("o1"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1210"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("eur"));
        assert_eq!(
            get("success_url"),
            Some("https://sheetmates.test/fr/checkout/success?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(get("cancel_url"), Some("https://sheetmates.test/fr/checkout"));

        // a later change to the configured rate does not reach an existing order
        let reduced = Order { vat_rate: Some(0.06), ..order };
        let form = checkout_form(&reduced, "EUR", "https://sheetmates.test", Locale::Fr);
        let amount = form
            .iter()
            .find(|(key, _)| key == "line_items[0][price_data][unit_amount]")
            .map(|(_, v)| v.as_str());
        assert_eq!(amount, Some("1060"));
    }
}
