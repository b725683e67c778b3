use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rates and multipliers used to quote a part.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    pub per_cm2_rate: f64,
    pub per_mm_cut_rate: f64,
    pub material_multipliers: BTreeMap<String, f64>,
    pub thickness_multipliers: BTreeMap<String, f64>,
    pub complexity_multiplier: f64,
    pub bulk_discount_threshold: u32,
    pub bulk_discount_percent: f64,
    pub minimum_price: f64,
    pub vat_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let material_multipliers = [
            ("steel", 1.0),
            ("stainless", 1.8),
            ("aluminum", 1.4),
            ("copper", 2.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let thickness_multipliers = [
            ("1", 1.0),
            ("2", 1.2),
            ("3", 1.5),
            ("5", 2.0),
            ("8", 3.0),
            ("10", 4.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            per_cm2_rate: 0.05,
            per_mm_cut_rate: 0.01,
            material_multipliers,
            thickness_multipliers,
            complexity_multiplier: 1.0,
            bulk_discount_threshold: 10,
            bulk_discount_percent: 10.0,
            minimum_price: 5.0,
            vat_rate: 0.21,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartPriceInput {
    pub area_mm2: f64,
    pub cut_length_mm: f64,
    pub material: String,
    pub thickness: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub area_cost: f64,
    pub cut_cost: f64,
    pub material_multiplier: f64,
    pub thickness_multiplier: f64,
    pub complexity_multiplier: f64,
    pub subtotal_per_unit: f64,
    pub bulk_discount: f64,
    pub price_per_unit: f64,
    pub total_before_vat: f64,
    pub vat: f64,
    pub total: f64,
}

/// Current state of a sheet's descending-price auction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuctionPrice {
    pub current_price: f64,
    pub price_drop_percent: f64,
    pub next_drop_time: DateTime<Utc>,
    pub next_drop_amount: f64,
    pub is_at_floor: bool,
    pub time_to_floor_ms: i64,
}
