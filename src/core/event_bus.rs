// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Event bus for store change notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use crate::alerts::{AlertStatus, Severity};
use crate::detection::DetectionClass;
use crate::sensors::Level;

/// What changed in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    SensorUpdated { sensor_id: String, value: f64, status: Level },
    ZoneUpdated { zone_id: String, status: Level, risk_level: u8 },
    AlertRaised { alert_id: String, severity: Severity, zone: String },
    AlertStatusChanged { alert_id: String, from: AlertStatus, to: AlertStatus },
    DetectionAdded { detection_id: String, camera_id: String, class: DetectionClass },
    DetectionsPruned { removed: usize },
    WorkerUpdated { worker_id: String },
    CameraUpdated { camera_id: String },
    SystemStatusUpdated,
    ScenarioTriggered { scenario: String, alert_id: String },
    SimulationToggled { running: bool },
    SimulationSpeedChanged { speed: f64 },
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: StoreEvent,
}

/// Fan-out of store changes to any number of views
pub struct EventBus {
    event_tx: broadcast::Sender<Event>,
    event_counter: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            event_tx,
            event_counter: AtomicU64::new(0),
        }
    }

    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, payload: StoreEvent) {
        let id = self.event_counter.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            id,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Events published so far
    pub fn published(&self) -> u64 {
        self.event_counter.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
