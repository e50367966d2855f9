// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Entity store - the single source of truth for plant state

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::alerts::{Alert, AlertStatus, KpiData, Severity};
use crate::detection::{Detection, DetectionBuffer, DEFAULT_CAPACITY};
use crate::plant::{seed, Camera, CameraStatus, Position, SafetyGear, SystemStatus, Worker, WorkerStatus, Zone};
use crate::sensors::{Level, Sensor};

/// Simulation gate and speed multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationState {
    pub running: bool,
    pub speed: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self { running: true, speed: 1.0 }
    }
}

/// Owns every entity collection. All mutation goes through `&mut self`, so
/// wrapping the store in a lock is enough to make each operation atomic.
///
/// Operations addressed by id are no-ops for unknown ids; they report
/// whether anything changed instead of failing.
#[derive(Debug, Clone)]
pub struct Store {
    zones: Vec<Zone>,
    sensors: Vec<Sensor>,
    cameras: Vec<Camera>,
    workers: Vec<Worker>,
    alerts: Vec<Alert>,
    detections: DetectionBuffer,
    kpi: KpiData,
    system_status: SystemStatus,
    simulation: SimulationState,
}

/// Immutable copy of the store for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub zones: Vec<Zone>,
    pub sensors: Vec<Sensor>,
    pub cameras: Vec<Camera>,
    pub workers: Vec<Worker>,
    pub alerts: Vec<Alert>,
    pub detections: Vec<Detection>,
    pub kpi: KpiData,
    pub system_status: SystemStatus,
    pub simulation: SimulationState,
}

impl Store {
    /// Empty store with the given detection capacity
    pub fn new(detection_capacity: usize) -> Self {
        Self {
            zones: Vec::new(),
            sensors: Vec::new(),
            cameras: Vec::new(),
            workers: Vec::new(),
            alerts: Vec::new(),
            detections: DetectionBuffer::new(detection_capacity),
            kpi: KpiData::default(),
            system_status: SystemStatus::default(),
            simulation: SimulationState::default(),
        }
    }

    /// Store seeded with the demo plant
    pub fn demo() -> Self {
        Self::demo_with_capacity(DEFAULT_CAPACITY)
    }

    pub fn demo_with_capacity(detection_capacity: usize) -> Self {
        let now = Utc::now();
        Self {
            zones: seed::zones(),
            sensors: seed::sensors(),
            cameras: seed::cameras(),
            workers: seed::workers(),
            alerts: seed::alerts(now),
            detections: DetectionBuffer::from_recent(detection_capacity, seed::detections(now)),
            kpi: seed::kpi(),
            system_status: seed::system_status(),
            simulation: SimulationState::default(),
        }
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_sensors(mut self, sensors: Vec<Sensor>) -> Self {
        self.sensors = sensors;
        self
    }

    pub fn with_cameras(mut self, cameras: Vec<Camera>) -> Self {
        self.cameras = cameras;
        self
    }

    pub fn with_workers(mut self, workers: Vec<Worker>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_kpi(mut self, kpi: KpiData) -> Self {
        self.kpi = kpi;
        self
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            zones: self.zones.clone(),
            sensors: self.sensors.clone(),
            cameras: self.cameras.clone(),
            workers: self.workers.clone(),
            alerts: self.alerts.clone(),
            detections: self.detections.to_vec(),
            kpi: self.kpi.clone(),
            system_status: self.system_status.clone(),
            simulation: self.simulation,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Most recent first
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn detections(&self) -> &DetectionBuffer {
        &self.detections
    }

    pub fn kpi(&self) -> &KpiData {
        &self.kpi
    }

    pub fn system_status(&self) -> &SystemStatus {
        &self.system_status
    }

    pub fn simulation(&self) -> SimulationState {
        self.simulation
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Write a reading and its derived status together.
    pub fn update_sensor_value(&mut self, sensor_id: &str, value: f64) -> bool {
        if !value.is_finite() {
            debug!("Ignoring non-finite value for sensor {}", sensor_id);
            return false;
        }
        match self.sensors.iter_mut().find(|s| s.id == sensor_id) {
            Some(sensor) => {
                sensor.set_value(value);
                true
            }
            None => {
                debug!("update_sensor_value: unknown sensor {}", sensor_id);
                false
            }
        }
    }

    /// Overwrite zone status and risk; color is recomputed from status.
    pub fn update_zone_status(&mut self, zone_id: &str, status: Level, risk_level: u8) -> bool {
        match self.zones.iter_mut().find(|z| z.id == zone_id) {
            Some(zone) => {
                zone.set_status(status, risk_level);
                true
            }
            None => {
                debug!("update_zone_status: unknown zone {}", zone_id);
                false
            }
        }
    }

    pub fn update_worker_position(&mut self, worker_id: &str, position: Position) -> bool {
        self.with_worker(worker_id, |w| w.position = position)
    }

    pub fn update_worker_safety_gear(&mut self, worker_id: &str, gear: SafetyGear) -> bool {
        self.with_worker(worker_id, |w| w.safety_gear = gear)
    }

    pub fn update_worker_status(&mut self, worker_id: &str, status: WorkerStatus) -> bool {
        self.with_worker(worker_id, |w| w.status = status)
    }

    fn with_worker(&mut self, worker_id: &str, f: impl FnOnce(&mut Worker)) -> bool {
        match self.workers.iter_mut().find(|w| w.id == worker_id) {
            Some(worker) => {
                f(worker);
                true
            }
            None => {
                debug!("Unknown worker {}", worker_id);
                false
            }
        }
    }

    pub fn set_camera_status(&mut self, camera_id: &str, status: CameraStatus) -> bool {
        match self.cameras.iter_mut().find(|c| c.id == camera_id) {
            Some(camera) => {
                camera.status = status;
                true
            }
            None => {
                debug!("set_camera_status: unknown camera {}", camera_id);
                false
            }
        }
    }

    pub fn set_system_status(&mut self, status: SystemStatus) {
        self.system_status = status;
    }

    /// Newest first; the oldest entry is evicted beyond capacity.
    pub fn add_detection(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    /// Drop detections at least `max_age` old. Returns how many were removed.
    pub fn clear_old_detections(&mut self, now: DateTime<Utc>, max_age: Duration) -> usize {
        self.detections.clear_older_than(now, max_age)
    }

    /// Prepend an alert and bump the raised-alert counters.
    pub fn add_alert(&mut self, alert: Alert) {
        self.alerts.insert(0, alert);
        self.kpi.record_raised();
    }

    /// Move an alert through its lifecycle. Returns the previous status when
    /// the transition happened; unknown ids and illegal transitions (anything
    /// out of `Resolved`, backwards or same-state) change nothing.
    pub fn update_alert_status(&mut self, alert_id: &str, status: AlertStatus) -> Option<AlertStatus> {
        let Some(alert) = self.alerts.iter_mut().find(|a| a.id == alert_id) else {
            debug!("update_alert_status: unknown alert {}", alert_id);
            return None;
        };
        let previous = alert.transition(status);
        match previous {
            Some(_) => self.kpi.record_transition(status),
            None => debug!("Alert {} ignored transition {:?} -> {:?}", alert_id, alert.status, status),
        }
        previous
    }

    /// Returns true when the flag actually changed.
    pub fn set_simulation_running(&mut self, running: bool) -> bool {
        let changed = self.simulation.running != running;
        self.simulation.running = running;
        changed
    }

    pub fn set_simulation_speed(&mut self, speed: f64) {
        self.simulation.speed = speed;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Snapshot {
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn new_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.status == AlertStatus::New)
    }

    /// Critical and not yet resolved
    pub fn active_critical_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical && a.is_active())
    }

    pub fn active_workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter().filter(|w| w.status == WorkerStatus::Active)
    }

    pub fn online_cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter().filter(|c| c.is_online())
    }
}
