use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NestingPart {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NestingSheet {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NestingPlacement {
    pub part_id: String,
    pub sheet_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 0 or 90 degrees.
    pub rotation: u16,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NestingResult {
    pub placements: Vec<NestingPlacement>,
    pub sheets_used: usize,
    pub utilization: Vec<f64>,
}
