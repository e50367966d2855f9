//! Plant layout - zones, cameras, workers and exogenous system telemetry

pub mod seed;

use serde::{Deserialize, Serialize};

use crate::sensors::Level;

/// 2D position on the plant map (percent of map width/height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named physical area with an aggregate risk status.
///
/// `color` is denormalized from `status` and only written through
/// [`Zone::set_status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub description: String,
    status: Level,
    risk_level: u8,
    pub position: Position,
    color: String,
}

impl Zone {
    pub fn new(id: &str, name: &str, description: &str, status: Level, risk_level: u8, position: Position) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status,
            risk_level: risk_level.min(100),
            position,
            color: status.color().to_string(),
        }
    }

    pub fn status(&self) -> Level {
        self.status
    }

    pub fn risk_level(&self) -> u8 {
        self.risk_level
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Overwrite status and risk; risk is clamped to 0..=100.
    pub fn set_status(&mut self, status: Level, risk_level: u8) {
        self.status = status;
        self.risk_level = risk_level.min(100);
        self.color = status.color().to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    Online,
    Offline,
}

/// CCTV camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub status: CameraStatus,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
}

impl Camera {
    pub fn new(id: &str, name: &str, zone: &str, status: CameraStatus, location: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            zone: zone.to_string(),
            status,
            location: location.to_string(),
            stream_url: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == CameraStatus::Online
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Active,
    Break,
    Offline,
}

/// Personal protective equipment seen on a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyGear {
    pub helmet: bool,
    pub vest: bool,
    pub gloves: bool,
}

impl SafetyGear {
    pub const FULL: SafetyGear = SafetyGear { helmet: true, vest: true, gloves: true };

    pub fn is_complete(&self) -> bool {
        self.helmet && self.vest && self.gloves
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub role: String,
    pub zone: String,
    pub status: WorkerStatus,
    pub position: Position,
    pub safety_gear: SafetyGear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Online,
    Degraded,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionAiStatus {
    pub status: ServiceStatus,
    pub processed_frames: u64,
    pub detection_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorAiStatus {
    pub status: ServiceStatus,
    pub active_sensors: u32,
    pub total_sensors: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub status: ServiceStatus,
    pub latency_ms: u32,
}

/// Read-only telemetry supplied from outside the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub vision_ai: VisionAiStatus,
    pub sensor_ai: SensorAiStatus,
    pub network: NetworkStatus,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            vision_ai: VisionAiStatus {
                status: ServiceStatus::Offline,
                processed_frames: 0,
                detection_count: 0,
            },
            sensor_ai: SensorAiStatus {
                status: ServiceStatus::Offline,
                active_sensors: 0,
                total_sensors: 0,
            },
            network: NetworkStatus {
                status: ServiceStatus::Offline,
                latency_ms: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_color_follows_status() {
        let mut zone = Zone::new("zone-x", "Zone X", "test", Level::Normal, 10, Position::default());
        assert_eq!(zone.color(), Level::Normal.color());

        zone.set_status(Level::Danger, 95);
        assert_eq!(zone.color(), "#EF4444");
        assert_eq!(zone.risk_level(), 95);

        zone.set_status(Level::Caution, 250);
        assert_eq!(zone.color(), "#F59E0B");
        assert_eq!(zone.risk_level(), 100);
    }

    #[test]
    fn test_safety_gear_complete() {
        assert!(SafetyGear::FULL.is_complete());
        let no_helmet = SafetyGear { helmet: false, ..SafetyGear::FULL };
        assert!(!no_helmet.is_complete());
    }
}
