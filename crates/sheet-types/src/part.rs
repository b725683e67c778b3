use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, DfmIssue, DfmSummary};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    #[default]
    Pending,
    Nested,
    Cut,
    Shipped,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartPosition {
    pub x: f64,
    pub y: f64,
    pub rotation: u16,
}

/// A customer's uploaded design, analyzed and waiting for (or placed on) a sheet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub file_url: String,
    pub bounding_box: PartSize,
    pub svg_path: String,
    pub area: f64,
    pub cut_length: f64,
    pub quantity: u32,
    pub status: PartStatus,
    pub sheet_id: Option<String>,
    pub position: Option<PartPosition>,
    pub created_at: DateTime<Utc>,
}

/// Geometry, preview and manufacturability report for one DXF drawing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartAnalysis {
    pub file_name: String,
    pub bounding_box: BoundingBox,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub cut_length: f64,
    pub entity_count: usize,
    pub svg_path: String,
    pub view_box: String,
    pub dfm: Vec<DfmIssue>,
    pub summary: DfmSummary,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub part: Part,
    pub analysis: PartAnalysis,
}
