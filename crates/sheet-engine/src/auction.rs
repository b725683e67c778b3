//! Descending-price ("Dutch") auctions for buffer sheets.
//!
//! Price follows `P(t) = floor + (initial - floor) * e^(-decay * minutes)`.

use chrono::{DateTime, Duration, Utc};
use sheet_types::{AuctionPrice, Sheet};
use thiserror::Error;

pub const BASE_DECAY_RATE: f64 = 0.02;

#[derive(Debug, Error, PartialEq)]
pub enum AuctionError {
    #[error("Decay rate must be positive")]
    NonPositiveDecay,
    #[error("Prices must be non-negative")]
    NegativePrice,
    #[error("Floor price cannot exceed initial price")]
    FloorAboveInitial,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuctionConfig {
    pub initial_price: f64,
    pub floor_price: f64,
    pub decay_rate: f64,
    pub start_time: DateTime<Utc>,
}

impl AuctionConfig {
    /// Auction settings of a sheet, if it runs an auction.
    pub fn from_sheet(sheet: &Sheet) -> Option<Self> {
        if !sheet.auction_enabled {
            return None;
        }
        Some(Self {
            initial_price: sheet.initial_price?,
            floor_price: sheet.floor_price?,
            decay_rate: sheet.decay_rate.unwrap_or(BASE_DECAY_RATE),
            start_time: sheet.auction_start_time.unwrap_or(sheet.created_at),
        })
    }

    fn validate(&self) -> Result<(), AuctionError> {
        if self.decay_rate <= 0.0 {
            return Err(AuctionError::NonPositiveDecay);
        }
        if self.initial_price < 0.0 || self.floor_price < 0.0 {
            return Err(AuctionError::NegativePrice);
        }
        if self.floor_price > self.initial_price {
            return Err(AuctionError::FloorAboveInitial);
        }
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn calculate_auction_price(
    config: &AuctionConfig,
    now: DateTime<Utc>,
) -> Result<AuctionPrice, AuctionError> {
    config.validate()?;

    // Before the start the sheet sits at its initial price.
    let elapsedMs = (now - config.start_time).num_milliseconds().max(0) as f64;
    let elapsedMinutes = elapsedMs / 60_000.0;

    let spread = config.initial_price - config.floor_price;
    let priceAt = |minutes: f64| config.floor_price + spread * (-config.decay_rate * minutes).exp();

    let rawPrice = priceAt(elapsedMinutes);
    let currentPrice = round_cents(rawPrice).max(config.floor_price);
    let isAtFloor = currentPrice <= config.floor_price;
    let nextDropAmount = if isAtFloor {
        0.0
    } else {
        round_cents(rawPrice - priceAt(elapsedMinutes + 1.0))
    };

    let floorAfterMs = 100f64.ln() / config.decay_rate * 60_000.0;
    let timeToFloor = if isAtFloor {
        0
    } else {
        (floorAfterMs - elapsedMs).max(0.0) as i64
    };

    let priceDropPercent = if config.initial_price > 0.0 {
        (config.initial_price - currentPrice) / config.initial_price * 100.0
    } else {
        0.0
    };

    Ok(AuctionPrice {
        current_price: currentPrice,
        price_drop_percent: priceDropPercent,
        next_drop_time: now + Duration::minutes(1),
        next_drop_amount: nextDropAmount,
        is_at_floor: isAtFloor,
        time_to_floor_ms: timeToFloor,
    })
}

/// Decay rate scaled by how many open sheets of the material are waiting.
pub fn dynamic_decay_rate(inventoryCount: usize, baseRate: f64) -> f64 {
    match inventoryCount {
        n if n > 50 => baseRate * 2.5,
        n if n > 20 => baseRate * 1.5,
        n if n < 5 => baseRate * 0.5,
        _ => baseRate,
    }
}

/// What a customer pays to send a partly filled sheet to the cutter now.
pub fn bus_driver_premium(utilization: f64, sheetBaseCost: f64) -> f64 {
    let remaining = 1.0 - utilization.clamp(0.0, 1.0);
    round_cents(sheetBaseCost.max(0.0) * remaining * 1.2)
}
