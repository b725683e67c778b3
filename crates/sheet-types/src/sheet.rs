use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::AuctionPrice;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    #[default]
    Open,
    Full,
    Cutting,
    Done,
}

impl SheetStatus {
    /// Production floor transitions: a full sheet goes to the cutter, then is done.
    pub fn can_advance_to(&self, next: SheetStatus) -> bool {
        matches!(
            (self, next),
            (SheetStatus::Open, SheetStatus::Full)
                | (SheetStatus::Full, SheetStatus::Cutting)
                | (SheetStatus::Cutting, SheetStatus::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SheetStatus::Open => "open",
            SheetStatus::Full => "full",
            SheetStatus::Cutting => "cutting",
            SheetStatus::Done => "done",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SheetPlacement {
    pub part_id: String,
    pub x: f64,
    pub y: f64,
    pub rotation: u16,
    pub width: f64,
    pub height: f64,
}

/// A physical buffer sheet that parts get nested onto.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sheet {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub material: String,
    pub thickness: f64,
    pub placements: Vec<SheetPlacement>,
    pub utilization: f64,
    pub status: SheetStatus,
    #[serde(default)]
    pub auction_enabled: bool,
    #[serde(default)]
    pub initial_price: Option<f64>,
    #[serde(default)]
    pub floor_price: Option<f64>,
    #[serde(default)]
    pub decay_rate: Option<f64>,
    #[serde(default)]
    pub auction_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_lock_holder: Option<String>,
    #[serde(default)]
    pub lock_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lock_acquired_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An open sheet together with its live auction price, if it runs one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SheetListing {
    pub sheet: Sheet,
    pub auction: Option<AuctionPrice>,
    /// Surcharge for cutting the sheet at its current fill, from its base price.
    #[serde(default)]
    pub premium: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AvailableInventory {
    pub materials: Vec<String>,
    pub thicknesses_by_material: BTreeMap<String, Vec<f64>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockError {
    AlreadyLocked,
    SheetNotFound,
    SheetFull,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LockResult {
    pub success: bool,
    pub error: Option<LockError>,
    pub lock_expiry: Option<DateTime<Utc>>,
}

impl LockResult {
    pub fn granted(expiry: DateTime<Utc>) -> Self {
        Self {
            success: true,
            error: None,
            lock_expiry: Some(expiry),
        }
    }

    pub fn denied(error: LockError) -> Self {
        Self {
            success: false,
            error: Some(error),
            lock_expiry: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InjectSheetRequest {
    pub width: f64,
    pub height: f64,
    pub material: String,
    pub thickness: f64,
    pub quantity: u32,
    pub initial_price: f64,
    pub floor_price: f64,
    pub qr_code_prefix: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InjectedSheet {
    pub id: String,
    pub qr_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateSheetStatusRequest {
    pub status: SheetStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NestRequest {
    pub part_ids: Vec<String>,
    pub material: String,
    pub thickness: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AutoNestResult {
    pub sheet_id: String,
    pub utilization: f64,
    pub placed_part_ids: Vec<String>,
    pub unplaced_part_ids: Vec<String>,
    /// Parts already on the sheet that no longer fit and went back to pending.
    #[serde(default)]
    pub displaced_part_ids: Vec<String>,
    pub is_new_sheet: bool,
}
