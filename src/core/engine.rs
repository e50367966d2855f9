//! Main engine - command surface over the store plus background tasks

use anyhow::Result;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{Event, EventBus, Scheduler, Snapshot, Store, StoreEvent};
use crate::alerts::{Alert, AlertStatus};
use crate::config::{clamp_speed, Config, ConfigError};
use crate::detection::{Detection, VisionFeed};
use crate::plant::{CameraStatus, Position, SafetyGear, SystemStatus, WorkerStatus};
use crate::scenarios::{Injection, ScenarioCatalog};
use crate::sensors::{DriftSimulator, Level};

const DRIFT_TASK: &str = "sensor-drift";
const FEED_TASK: &str = "vision-feed";
const PRUNE_TASK: &str = "detection-prune";

/// State shared with background tasks
#[derive(Clone)]
struct Core {
    config: Arc<Config>,
    store: Arc<RwLock<Store>>,
    drift: Arc<Mutex<DriftSimulator>>,
    feed: Arc<Mutex<VisionFeed>>,
    event_bus: Arc<EventBus>,
}

impl Core {
    /// One drift step across all sensors, skipped while the simulation is
    /// stopped. The flag is checked under the same lock the write takes.
    fn drift_tick(&self) -> usize {
        let updates: Vec<StoreEvent> = {
            let mut store = self.store.write();
            if !store.simulation().running {
                return 0;
            }
            let written = self.drift.lock().tick(&mut store);
            let events: Vec<StoreEvent> = written
                .iter()
                .filter_map(|id| store.sensor(id))
                .map(|s| StoreEvent::SensorUpdated {
                    sensor_id: s.id.clone(),
                    value: s.current_value(),
                    status: s.status(),
                })
                .collect();
            events
        };

        let written = updates.len();
        for event in updates {
            self.event_bus.publish(event);
        }
        written
    }

    fn vision_feed_tick(&self) -> Option<String> {
        let event = {
            let mut store = self.store.write();
            if !store.simulation().running {
                return None;
            }
            let detection = self.feed.lock().sample_anomaly(store.cameras(), Utc::now())?;
            let event = detection_event(&detection);
            store.add_detection(detection);
            event
        };

        let id = match &event {
            StoreEvent::DetectionAdded { detection_id, .. } => Some(detection_id.clone()),
            _ => None,
        };
        self.event_bus.publish(event);
        id
    }

    fn prune_detections(&self) -> usize {
        let removed = self
            .store
            .write()
            .clear_old_detections(Utc::now(), self.config.detection.max_age());
        if removed > 0 {
            debug!("Pruned {} stale detections", removed);
            self.event_bus.publish(StoreEvent::DetectionsPruned { removed });
        }
        removed
    }

    fn drift_period(&self) -> Duration {
        let speed = self.store.read().simulation().speed;
        self.config.simulation.period(speed)
    }
}

fn detection_event(detection: &Detection) -> StoreEvent {
    StoreEvent::DetectionAdded {
        detection_id: detection.id.clone(),
        camera_id: detection.camera_id.clone(),
        class: detection.class,
    }
}

/// Main PlantWatch engine.
///
/// Every command takes the store lock once, so each is observed as a single
/// atomic update. Commands addressed by id report whether anything changed;
/// none of them fail for unknown ids.
pub struct Engine {
    core: Core,
    catalog: Arc<ScenarioCatalog>,
    scheduler: Scheduler,
    start_time: Option<Instant>,
}

impl Engine {
    /// Build the engine from configuration: seed the store (demo mode) and
    /// load the scenario catalog.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let store = if config.demo_mode {
            Store::demo_with_capacity(config.detection.capacity)
        } else {
            Store::new(config.detection.capacity)
        };

        let catalog = match &config.scenarios.catalog_path {
            Some(path) => ScenarioCatalog::load(path)?,
            None => ScenarioCatalog::builtin(),
        };
        if config.demo_mode {
            catalog.validate_against(&store)?;
        }

        Self::with_parts(config, store, catalog)
    }

    /// Build the engine around an explicit store and catalog.
    pub fn with_parts(config: Config, mut store: Store, catalog: ScenarioCatalog) -> Result<Self> {
        config.validate()?;
        for sensor in store.sensors() {
            sensor.thresholds().validate().map_err(|source| ConfigError::Thresholds {
                sensor: sensor.id.clone(),
                source,
            })?;
        }

        store.set_simulation_running(config.simulation.enabled_on_start);
        store.set_simulation_speed(config.simulation.speed);

        let seed = config.simulation.seed;
        let drift = DriftSimulator::new(
            config.simulation.noise_amplitude,
            config.simulation.round_decimals,
            seed,
        );
        let feed = VisionFeed::new(seed.map(|s| s.wrapping_add(1)));

        info!(
            "Engine ready: {} zones, {} sensors, {} cameras, {} scenarios",
            store.zones().len(),
            store.sensors().len(),
            store.cameras().len(),
            catalog.len()
        );

        Ok(Self {
            core: Core {
                config: Arc::new(config),
                store: Arc::new(RwLock::new(store)),
                drift: Arc::new(Mutex::new(drift)),
                feed: Arc::new(Mutex::new(feed)),
                event_bus: Arc::new(EventBus::default()),
            },
            catalog: Arc::new(catalog),
            scheduler: Scheduler::new(),
            start_time: None,
        })
    }

    /// Start the background tasks. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        info!("Starting PlantWatch engine...");
        self.start_time = Some(Instant::now());

        let core = self.core.clone();
        let period_core = self.core.clone();
        self.scheduler.add_task(DRIFT_TASK, move || period_core.drift_period(), move || {
            core.drift_tick();
        });

        if self.core.config.detection.vision_feed_enabled {
            let core = self.core.clone();
            let period = Duration::from_millis(self.core.config.detection.vision_feed_interval_ms);
            self.scheduler.add_task(FEED_TASK, move || period, move || {
                core.vision_feed_tick();
            });
        }

        let core = self.core.clone();
        let period = Duration::from_millis(self.core.config.detection.prune_interval_ms);
        self.scheduler.add_task(PRUNE_TASK, move || period, move || {
            core.prune_detections();
        });

        info!("PlantWatch engine started ({} tasks)", self.scheduler.task_names().len());
    }

    /// Stop the background tasks; in-flight ticks complete first.
    pub async fn stop(&mut self) {
        info!("Stopping PlantWatch engine...");
        self.scheduler.shutdown().await;
        info!("PlantWatch engine stopped");
    }

    pub fn config(&self) -> &Config {
        &self.core.config
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.core.event_bus.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.core.store.read().snapshot()
    }

    /// Run `f` against a read-locked store
    pub fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&self.core.store.read())
    }

    fn publish(&self, event: StoreEvent) {
        self.core.event_bus.publish(event);
    }

    pub fn update_sensor_value(&self, sensor_id: &str, value: f64) -> bool {
        let event = {
            let mut store = self.core.store.write();
            if !store.update_sensor_value(sensor_id, value) {
                return false;
            }
            store.sensor(sensor_id).map(|s| StoreEvent::SensorUpdated {
                sensor_id: s.id.clone(),
                value: s.current_value(),
                status: s.status(),
            })
        };
        if let Some(event) = event {
            self.publish(event);
        }
        true
    }

    pub fn update_zone_status(&self, zone_id: &str, status: Level, risk_level: u8) -> bool {
        let changed = self.core.store.write().update_zone_status(zone_id, status, risk_level);
        if changed {
            self.publish(StoreEvent::ZoneUpdated {
                zone_id: zone_id.to_string(),
                status,
                risk_level: risk_level.min(100),
            });
        }
        changed
    }

    pub fn update_worker_position(&self, worker_id: &str, position: Position) -> bool {
        let changed = self.core.store.write().update_worker_position(worker_id, position);
        if changed {
            self.publish(StoreEvent::WorkerUpdated { worker_id: worker_id.to_string() });
        }
        changed
    }

    pub fn update_worker_safety_gear(&self, worker_id: &str, gear: SafetyGear) -> bool {
        let changed = self.core.store.write().update_worker_safety_gear(worker_id, gear);
        if changed {
            self.publish(StoreEvent::WorkerUpdated { worker_id: worker_id.to_string() });
        }
        changed
    }

    pub fn update_worker_status(&self, worker_id: &str, status: WorkerStatus) -> bool {
        let changed = self.core.store.write().update_worker_status(worker_id, status);
        if changed {
            self.publish(StoreEvent::WorkerUpdated { worker_id: worker_id.to_string() });
        }
        changed
    }

    pub fn set_camera_status(&self, camera_id: &str, status: CameraStatus) -> bool {
        let changed = self.core.store.write().set_camera_status(camera_id, status);
        if changed {
            self.publish(StoreEvent::CameraUpdated { camera_id: camera_id.to_string() });
        }
        changed
    }

    pub fn set_system_status(&self, status: SystemStatus) {
        self.core.store.write().set_system_status(status);
        self.publish(StoreEvent::SystemStatusUpdated);
    }

    pub fn add_alert(&self, alert: Alert) {
        let event = StoreEvent::AlertRaised {
            alert_id: alert.id.clone(),
            severity: alert.severity,
            zone: alert.zone.clone(),
        };
        info!("Alert raised: [{:?}] {}", alert.severity, alert.title);
        self.core.store.write().add_alert(alert);
        self.publish(event);
    }

    /// Returns true when the transition was legal and applied.
    pub fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> bool {
        let previous = self.core.store.write().update_alert_status(alert_id, status);
        match previous {
            Some(from) => {
                info!("Alert {} {:?} -> {:?}", alert_id, from, status);
                self.publish(StoreEvent::AlertStatusChanged {
                    alert_id: alert_id.to_string(),
                    from,
                    to: status,
                });
                true
            }
            None => false,
        }
    }

    pub fn add_detection(&self, detection: Detection) {
        let event = detection_event(&detection);
        self.core.store.write().add_detection(detection);
        self.publish(event);
    }

    /// Drop detections older than the configured maximum age.
    pub fn clear_old_detections(&self) -> usize {
        self.core.prune_detections()
    }

    /// Inject a catalog scenario. Unknown ids change nothing.
    pub fn trigger_scenario(&self, scenario_id: &str) -> Option<Injection> {
        let (injection, events) = {
            let mut store = self.core.store.write();
            let injection = self.catalog.trigger(scenario_id, &mut store, Utc::now())?;
            let events = self.scenario_events(scenario_id, &store, &injection);
            (injection, events)
        };

        for event in events {
            self.publish(event);
        }
        Some(injection)
    }

    fn scenario_events(&self, scenario_id: &str, store: &Store, injection: &Injection) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        if let Some(bundle) = self.catalog.get(scenario_id) {
            for update in &bundle.zone_updates {
                if let Some(zone) = store.zone(&update.zone) {
                    events.push(StoreEvent::ZoneUpdated {
                        zone_id: zone.id.clone(),
                        status: zone.status(),
                        risk_level: zone.risk_level(),
                    });
                }
            }
            for forced in &bundle.sensor_overrides {
                if let Some(sensor) = store.sensor(&forced.sensor) {
                    events.push(StoreEvent::SensorUpdated {
                        sensor_id: sensor.id.clone(),
                        value: sensor.current_value(),
                        status: sensor.status(),
                    });
                }
            }
        }
        if let Some(alert) = store.alert(&injection.alert_id) {
            events.push(StoreEvent::AlertRaised {
                alert_id: alert.id.clone(),
                severity: alert.severity,
                zone: alert.zone.clone(),
            });
        }
        if let Some(detection) = store.detections().latest().filter(|d| Some(&d.id) == injection.detection_id.as_ref()) {
            events.push(detection_event(detection));
        }
        events.push(StoreEvent::ScenarioTriggered {
            scenario: scenario_id.to_string(),
            alert_id: injection.alert_id.clone(),
        });
        events
    }

    pub fn start_simulation(&self) {
        self.set_running(true);
    }

    /// No automatic sensor mutation happens after this returns until the
    /// simulation is started again.
    pub fn stop_simulation(&self) {
        self.set_running(false);
    }

    fn set_running(&self, running: bool) {
        if self.core.store.write().set_simulation_running(running) {
            info!("Simulation {}", if running { "started" } else { "stopped" });
            self.publish(StoreEvent::SimulationToggled { running });
        }
    }

    pub fn is_simulation_running(&self) -> bool {
        self.core.store.read().simulation().running
    }

    /// Set the speed multiplier; it shortens the drift period. Out-of-range
    /// values are clamped and non-finite ones ignored. Returns the applied
    /// speed.
    pub fn set_simulation_speed(&self, multiplier: f64) -> f64 {
        let mut store = self.core.store.write();
        let Some(speed) = clamp_speed(multiplier) else {
            debug!("Ignoring non-finite simulation speed");
            return store.simulation().speed;
        };
        store.set_simulation_speed(speed);
        drop(store);

        info!("Simulation speed set to {}x", speed);
        self.publish(StoreEvent::SimulationSpeedChanged { speed });
        speed
    }

    /// Run one drift step now, outside the timer
    pub fn step_simulation(&self) -> usize {
        self.core.drift_tick()
    }

    /// Run one synthetic vision-feed step now, outside the timer
    pub fn step_vision_feed(&self) -> Option<String> {
        self.core.vision_feed_tick()
    }

    pub fn drift_ticks(&self) -> u64 {
        self.core.drift.lock().ticks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertKind, AlertSource, Severity};
    use crate::scenarios::GAS_LEAK;

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.simulation.seed = Some(5);
        config
    }

    fn engine() -> Engine {
        Engine::new(seeded_config()).unwrap()
    }

    #[test]
    fn test_trigger_gas_leak_publishes_events() {
        let engine = engine();
        let mut rx = engine.subscribe();

        let injection = engine.trigger_scenario(GAS_LEAK).unwrap();
        let snap = engine.snapshot();
        assert_eq!(snap.zone("zone-d").unwrap().risk_level(), 95);
        assert_eq!(snap.sensor("sensor-008").unwrap().status(), Level::Danger);
        assert_eq!(snap.alerts[0].id, injection.alert_id);

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.payload);
        }
        assert!(matches!(kinds.first(), Some(StoreEvent::ZoneUpdated { zone_id, .. }) if zone_id == "zone-d"));
        assert!(matches!(kinds.last(), Some(StoreEvent::ScenarioTriggered { scenario, .. }) if scenario == GAS_LEAK));
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_unknown_scenario_publishes_nothing() {
        let engine = engine();
        let mut rx = engine.subscribe();
        let kpi = engine.snapshot().kpi;
        assert!(engine.trigger_scenario("earthquake").is_none());
        assert!(rx.try_recv().is_err());
        assert_eq!(engine.snapshot().kpi, kpi);
    }

    #[test]
    fn test_alert_lifecycle_through_engine() {
        let engine = engine();
        let alert = Alert::new(
            AlertKind::Environment,
            Severity::Info,
            "Humidity high",
            "C01 humidity rising",
            "zone-c",
            AlertSource::Sensor,
            Utc::now(),
        );
        let id = alert.id.clone();
        let base = engine.snapshot().kpi;

        engine.add_alert(alert);
        assert!(engine.update_alert_status(&id, AlertStatus::Acknowledged));
        assert_eq!(engine.snapshot().kpi.pending_alerts, base.pending_alerts + 1);

        assert!(engine.update_alert_status(&id, AlertStatus::Resolved));
        assert!(!engine.update_alert_status(&id, AlertStatus::Resolved));
        let kpi = engine.snapshot().kpi;
        assert_eq!(kpi.pending_alerts, base.pending_alerts);
        assert_eq!(kpi.resolved_alerts, base.resolved_alerts + 1);
    }

    #[test]
    fn test_step_simulation_respects_flag() {
        let engine = engine();
        assert_eq!(engine.step_simulation(), 8);
        assert_eq!(engine.drift_ticks(), 1);

        engine.stop_simulation();
        let before = engine.snapshot().sensors;
        assert_eq!(engine.step_simulation(), 0);
        assert!(engine.step_vision_feed().is_none());
        assert_eq!(engine.snapshot().sensors, before);
        assert_eq!(engine.drift_ticks(), 1);
    }

    #[test]
    fn test_drift_events_match_written_sensors() {
        let engine = engine();
        let mut rx = engine.subscribe();

        let written = engine.step_simulation();
        let mut updated = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let StoreEvent::SensorUpdated { sensor_id, value, .. } = event.payload {
                assert_eq!(engine.read(|s| s.sensor(&sensor_id).map(|x| x.current_value())), Some(value));
                updated.push(sensor_id);
            }
        }
        assert_eq!(written, 8);
        assert_eq!(updated.len(), written);

        let mut config = seeded_config();
        config.demo_mode = false;
        let empty = Engine::new(config).unwrap();
        let mut rx = empty.subscribe();
        assert_eq!(empty.step_simulation(), 0);
        assert_eq!(empty.drift_ticks(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_worker_status_publishes() {
        let engine = engine();
        let mut rx = engine.subscribe();
        let active = engine.snapshot().active_workers().count();

        assert!(engine.update_worker_status("worker-001", WorkerStatus::Break));
        assert!(matches!(
            rx.try_recv().map(|e| e.payload),
            Ok(StoreEvent::WorkerUpdated { worker_id }) if worker_id == "worker-001"
        ));
        assert_eq!(engine.snapshot().active_workers().count(), active - 1);
        assert_eq!(
            engine.read(|s| s.worker("worker-001").map(|w| w.status)),
            Some(WorkerStatus::Break)
        );

        assert!(!engine.update_worker_status("worker-999", WorkerStatus::Offline));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_uptime_before_start() {
        assert_eq!(engine().uptime(), 0);
    }

    #[test]
    fn test_simulation_speed_clamped() {
        let engine = engine();
        assert_eq!(engine.set_simulation_speed(4.0), 4.0);
        assert_eq!(engine.set_simulation_speed(50.0), 10.0);
        assert_eq!(engine.set_simulation_speed(f64::NAN), 10.0);
        assert_eq!(engine.core.drift_period(), Duration::from_millis(200));
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        use crate::sensors::{Sensor, SensorKind, Thresholds};
        let bad = Sensor::new(
            "sensor-bad",
            "Bad",
            SensorKind::Gas,
            "zone-a",
            Position::default(),
            1.0,
            Thresholds::new(50.0, 25.0, 100.0),
        );
        let store = Store::default().with_sensors(vec![bad]);
        assert!(Engine::with_parts(Config::default(), store, ScenarioCatalog::empty()).is_err());
    }

    #[test]
    fn test_non_demo_store_is_empty() {
        let mut config = seeded_config();
        config.demo_mode = false;
        let engine = Engine::new(config).unwrap();
        let snap = engine.snapshot();
        assert!(snap.zones.is_empty() && snap.sensors.is_empty() && snap.alerts.is_empty());
        // scenarios still append their alert
        assert!(engine.trigger_scenario(GAS_LEAK).is_some());
        assert_eq!(engine.snapshot().alerts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_drift_stops_with_flag() {
        let mut config = seeded_config();
        config.detection.vision_feed_enabled = false;
        let mut engine = Engine::new(config).unwrap();
        engine.start();

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(engine.drift_ticks(), 5);
        for sensor in engine.snapshot().sensors {
            assert!(sensor.current_value() >= 0.0);
            assert!(sensor.is_consistent());
        }

        engine.stop_simulation();
        let frozen = engine.snapshot().sensors;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(engine.drift_ticks(), 5);
        assert_eq!(engine.snapshot().sensors, frozen);

        engine.start_simulation();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(engine.drift_ticks() > 5);

        engine.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_shortens_period() {
        let mut config = seeded_config();
        config.detection.vision_feed_enabled = false;
        config.simulation.speed = 4.0;
        let mut engine = Engine::new(config).unwrap();
        engine.start();

        // 500 ms period at 4x
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(engine.drift_ticks(), 4);
        engine.stop().await;
    }
}
