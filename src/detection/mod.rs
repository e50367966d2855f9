//! Detection module - vision inference events, bounded history and synthetic feed

mod buffer;
mod feed;

pub use buffer::{DetectionBuffer, DEFAULT_CAPACITY, DEFAULT_MAX_AGE_SECS};
pub use feed::VisionFeed;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visual classes recognized by the vision model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionClass {
    Person,
    Helmet,
    NoHelmet,
    Fire,
    Smoke,
    GasLeak,
    FallenPerson,
}

impl DetectionClass {
    /// Classes that represent a safety anomaly on their own
    pub fn is_anomalous(self) -> bool {
        !matches!(self, DetectionClass::Person | DetectionClass::Helmet)
    }

    pub fn label(self) -> &'static str {
        match self {
            DetectionClass::Person => "Worker detected",
            DetectionClass::Helmet => "Helmet on",
            DetectionClass::NoHelmet => "No helmet",
            DetectionClass::Fire => "Fire detected",
            DetectionClass::Smoke => "Smoke detected",
            DetectionClass::GasLeak => "Gas leak detected",
            DetectionClass::FallenPerson => "Fallen worker",
        }
    }
}

/// Bounding box in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A timestamped vision-inference event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: String,
    pub camera_id: String,
    pub class: DetectionClass,
    pub label: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
    pub timestamp: DateTime<Utc>,
    pub is_anomaly: bool,
}

impl Detection {
    /// New detection with a fresh id; confidence is clamped to [0, 1].
    pub fn new(camera_id: &str, class: DetectionClass, confidence: f64, bbox: BoundingBox, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("det-{}", uuid::Uuid::new_v4().simple()),
            camera_id: camera_id.to_string(),
            class,
            label: class.label().to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            bbox,
            timestamp,
            is_anomaly: class.is_anomalous(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}
