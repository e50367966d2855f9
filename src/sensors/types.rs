// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor entity and common types

use serde::{Deserialize, Serialize};

use super::classifier::{classify, Level, Thresholds};
use crate::plant::Position;

/// Sensor types deployed across the plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Gas,
    Temperature,
    Vibration,
    Dust,
    Humidity,
}

impl SensorKind {
    /// Default unit reported by this kind of sensor
    pub fn default_unit(self) -> &'static str {
        match self {
            SensorKind::Gas => "ppm",
            SensorKind::Temperature => "°C",
            SensorKind::Vibration => "mm/s",
            SensorKind::Dust => "μg/m³",
            SensorKind::Humidity => "%",
        }
    }
}

/// A typed telemetry source with threshold-based status.
///
/// `status` is derived: it is recomputed from `current_value` on every write
/// and is never accepted from outside, including on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SensorRecord")]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub kind: SensorKind,
    pub zone: String,
    pub position: Position,
    current_value: f64,
    pub unit: String,
    thresholds: Thresholds,
    status: Level,
}

impl Sensor {
    pub fn new(
        id: &str,
        name: &str,
        kind: SensorKind,
        zone: &str,
        position: Position,
        value: f64,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            zone: zone.to_string(),
            position,
            current_value: value,
            unit: kind.default_unit().to_string(),
            thresholds,
            status: classify(value, &thresholds),
        }
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn status(&self) -> Level {
        self.status
    }

    /// Write a new reading; value and status change together.
    pub fn set_value(&mut self, value: f64) {
        self.current_value = value;
        self.status = classify(value, &self.thresholds);
    }

    /// Whether the stored status still matches the classifier
    pub fn is_consistent(&self) -> bool {
        self.status == classify(self.current_value, &self.thresholds)
    }
}

/// Wire form of a sensor; any incoming `status` is ignored.
#[derive(Deserialize)]
struct SensorRecord {
    id: String,
    name: String,
    kind: SensorKind,
    zone: String,
    position: Position,
    current_value: f64,
    unit: String,
    thresholds: Thresholds,
}

impl From<SensorRecord> for Sensor {
    fn from(r: SensorRecord) -> Self {
        let status = classify(r.current_value, &r.thresholds);
        Self {
            id: r.id,
            name: r.name,
            kind: r.kind,
            zone: r.zone,
            position: r.position,
            current_value: r.current_value,
            unit: r.unit,
            thresholds: r.thresholds,
            status,
        }
    }
}
