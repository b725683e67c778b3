use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DfmSeverity {
    Error,
    Warning,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DfmIssueKind {
    HoleTooSmall,
    FeatureTooSmall,
    SharpCorner,
    HighAspectRatio,
    OpenContour,
}

/// A manufacturability finding on an uploaded drawing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DfmIssue {
    #[serde(rename = "type")]
    pub kind: DfmIssueKind,
    pub severity: DfmSeverity,
    pub message: String,
    pub location: Option<Point>,
    pub entity_index: Option<usize>,
    pub value: Option<f64>,
    pub limit: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DfmSummary {
    pub errors: usize,
    pub warnings: usize,
    pub passed: bool,
}
