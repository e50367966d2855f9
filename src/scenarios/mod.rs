// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Scenario injection - scripted incidents replayed against the store
//!
//! A scenario is pure data: the zones it escalates, the sensors it forces,
//! the alert it raises and an optional vision detection. Adding a scenario
//! means adding a catalog entry, either in code or in a TOML table:
//!
//! ```toml
//! [scenarios.gas_leak]
//! name = "Gas leak"
//! zone_updates = [{ zone = "zone-d", status = "danger", risk_level = 95 }]
//! sensor_overrides = [{ sensor = "sensor-008", value = 150.0 }]
//!
//! [scenarios.gas_leak.alert]
//! kind = "safety"
//! severity = "critical"
//! # ...
//! ```

mod catalog;

pub use catalog::{FALLEN_WORKER, FIRE, GAS_LEAK, NO_HELMET};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::alerts::{Alert, AlertKind, AlertSource, Severity};
use crate::config::ConfigError;
use crate::core::Store;
use crate::detection::{BoundingBox, Detection, DetectionClass};
use crate::sensors::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub zone: String,
    pub status: Level,
    pub risk_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorOverride {
    pub sensor: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTemplate {
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub zone: String,
    pub source: AlertSource,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionTemplate {
    pub camera: String,
    pub class: DetectionClass,
    pub label: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

/// Everything one scenario does to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub zone_updates: Vec<ZoneUpdate>,
    #[serde(default)]
    pub sensor_overrides: Vec<SensorOverride>,
    pub alert: AlertTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionTemplate>,
}

/// What an injection wrote
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub scenario: String,
    pub alert_id: String,
    pub detection_id: Option<String>,
    pub zones_updated: usize,
    pub sensors_forced: usize,
}

/// Scenario table keyed by scenario id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, ScenarioBundle>,
}

impl ScenarioCatalog {
    pub fn empty() -> Self {
        Self { scenarios: BTreeMap::new() }
    }

    /// The four built-in demo incidents
    pub fn builtin() -> Self {
        Self {
            scenarios: catalog::builtin(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let catalog: ScenarioCatalog = toml::from_str(&content)?;
        catalog.validate()?;
        info!("Loaded {} scenarios from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn insert(&mut self, id: &str, bundle: ScenarioBundle) {
        self.scenarios.insert(id.to_string(), bundle);
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioBundle> {
        self.scenarios.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Checks that do not need a store
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (id, bundle) in &self.scenarios {
            if bundle.zone_updates.iter().any(|z| z.risk_level > 100) {
                return Err(ConfigError::Scenario(id.clone(), "risk_level above 100".into()));
            }
            if bundle.sensor_overrides.iter().any(|s| !s.value.is_finite()) {
                return Err(ConfigError::Scenario(id.clone(), "non-finite sensor value".into()));
            }
            if let Some(d) = &bundle.detection {
                if !(0.0..=1.0).contains(&d.confidence) {
                    return Err(ConfigError::Scenario(id.clone(), "confidence outside [0, 1]".into()));
                }
            }
        }
        Ok(())
    }

    /// Every zone, sensor and camera a scenario names must exist in `store`
    pub fn validate_against(&self, store: &Store) -> Result<(), ConfigError> {
        for (id, bundle) in &self.scenarios {
            for update in &bundle.zone_updates {
                if store.zone(&update.zone).is_none() {
                    return Err(ConfigError::Scenario(id.clone(), format!("unknown zone {}", update.zone)));
                }
            }
            for forced in &bundle.sensor_overrides {
                if store.sensor(&forced.sensor).is_none() {
                    return Err(ConfigError::Scenario(id.clone(), format!("unknown sensor {}", forced.sensor)));
                }
            }
            if let Some(d) = &bundle.detection {
                if !store.cameras().iter().any(|c| c.id == d.camera) {
                    return Err(ConfigError::Scenario(id.clone(), format!("unknown camera {}", d.camera)));
                }
            }
        }
        Ok(())
    }

    /// Apply scenario `id` to the store. Unknown ids change nothing.
    ///
    /// Order: zone escalation, forced sensor readings, the alert, then the
    /// detection. Every call raises a new alert with its own id.
    pub fn trigger(&self, id: &str, store: &mut Store, now: DateTime<Utc>) -> Option<Injection> {
        let Some(bundle) = self.scenarios.get(id) else {
            debug!("Ignoring unknown scenario '{}'", id);
            return None;
        };

        let zones_updated = bundle
            .zone_updates
            .iter()
            .filter(|u| store.update_zone_status(&u.zone, u.status, u.risk_level))
            .count();

        let sensors_forced = bundle
            .sensor_overrides
            .iter()
            .filter(|o| store.update_sensor_value(&o.sensor, o.value))
            .count();

        let t = &bundle.alert;
        let alert = Alert::new(t.kind, t.severity, &t.title, &t.description, &t.zone, t.source, now)
            .with_recommendation(&t.recommendation);
        let alert_id = alert.id.clone();
        store.add_alert(alert);

        let detection_id = bundle.detection.as_ref().map(|t| {
            let detection = Detection::new(&t.camera, t.class, t.confidence, t.bbox, now).with_label(&t.label);
            let id = detection.id.clone();
            store.add_detection(detection);
            id
        });

        info!(
            "Scenario '{}' injected: alert {}, {} zone(s), {} sensor(s)",
            id, alert_id, zones_updated, sensors_forced
        );

        Some(Injection {
            scenario: id.to_string(),
            alert_id,
            detection_id,
            zones_updated,
            sensors_forced,
        })
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertStatus;

    #[test]
    fn test_gas_leak() {
        let mut store = Store::demo();
        let catalog = ScenarioCatalog::builtin();
        let kpi = store.kpi().clone();
        let alerts = store.alerts().len();

        let injection = catalog.trigger(GAS_LEAK, &mut store, Utc::now()).unwrap();
        assert_eq!(injection.zones_updated, 1);
        assert_eq!(injection.sensors_forced, 1);
        assert!(injection.detection_id.is_none());

        let zone = store.zone("zone-d").unwrap();
        assert_eq!(zone.status(), Level::Danger);
        assert_eq!(zone.risk_level(), 95);
        assert_eq!(zone.color(), Level::Danger.color());

        let sensor = store.sensor("sensor-008").unwrap();
        assert_eq!(sensor.current_value(), 150.0);
        assert_eq!(sensor.status(), Level::Danger);

        assert_eq!(store.alerts().len(), alerts + 1);
        let alert = &store.alerts()[0];
        assert_eq!(alert.id, injection.alert_id);
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.zone, "zone-d");
        assert_eq!(alert.source, AlertSource::Sensor);
        assert_eq!(alert.status, AlertStatus::New);
        assert!(!alert.ai_recommendation.as_deref().unwrap_or_default().is_empty());

        assert_eq!(store.kpi().pending_alerts, kpi.pending_alerts + 1);
        assert_eq!(store.kpi().today_detections, kpi.today_detections + 1);
    }

    #[test]
    fn test_fire() {
        let mut store = Store::demo();
        let detections = store.detections().len();
        let injection = ScenarioCatalog::builtin().trigger(FIRE, &mut store, Utc::now()).unwrap();

        let zone = store.zone("zone-b").unwrap();
        assert_eq!((zone.status(), zone.risk_level()), (Level::Danger, 90));
        assert_eq!(injection.sensors_forced, 0);

        assert_eq!(store.detections().len(), detections + 1);
        let det = store.detections().latest().unwrap();
        assert_eq!(Some(&det.id), injection.detection_id.as_ref());
        assert_eq!(det.camera_id, "cam-003");
        assert_eq!(det.class, DetectionClass::Smoke);
        assert_eq!(det.confidence, 0.94);
        assert!(det.is_anomaly);
        assert_eq!(store.alerts()[0].source, AlertSource::VisionAi);
    }

    #[test]
    fn test_vision_scenarios_leave_zones_alone() {
        for id in [FALLEN_WORKER, NO_HELMET] {
            let mut store = Store::demo();
            let zones = store.snapshot().zones;
            let sensors = store.snapshot().sensors;

            let injection = ScenarioCatalog::builtin().trigger(id, &mut store, Utc::now()).unwrap();
            assert_eq!(injection.zones_updated, 0);
            assert!(injection.detection_id.is_some());
            assert_eq!(store.snapshot().zones, zones);
            assert_eq!(store.snapshot().sensors, sensors);
        }

        let mut store = Store::demo();
        ScenarioCatalog::builtin().trigger(NO_HELMET, &mut store, Utc::now());
        assert_eq!(store.alerts()[0].severity, Severity::Warning);
        assert_eq!(store.alerts()[0].zone, "zone-a");
    }

    #[test]
    fn test_unknown_scenario_is_noop() {
        let mut store = Store::demo();
        let before = store.snapshot();
        assert!(ScenarioCatalog::builtin().trigger("meteor", &mut store, Utc::now()).is_none());

        let after = store.snapshot();
        assert_eq!(before.alerts, after.alerts);
        assert_eq!(before.kpi, after.kpi);
        assert_eq!(before.zones, after.zones);
        assert_eq!(before.sensors, after.sensors);
        assert_eq!(before.detections, after.detections);
    }

    #[test]
    fn test_repeated_trigger_appends_distinct_alerts() {
        let mut store = Store::demo();
        let catalog = ScenarioCatalog::builtin();
        let now = Utc::now();
        let a = catalog.trigger(GAS_LEAK, &mut store, now).unwrap();
        let b = catalog.trigger(GAS_LEAK, &mut store, now).unwrap();
        assert_ne!(a.alert_id, b.alert_id);
        assert_eq!(store.alerts()[0].id, b.alert_id);
        assert_eq!(store.alerts()[1].id, a.alert_id);
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let catalog = ScenarioCatalog::builtin();
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![FALLEN_WORKER, FIRE, GAS_LEAK, NO_HELMET]);
        catalog.validate().unwrap();
        catalog.validate_against(&Store::demo()).unwrap();
        assert!(catalog.validate_against(&Store::default()).is_err());
    }

    #[test]
    fn test_catalog_toml_roundtrip_and_custom_entry() {
        let toml_text = toml::to_string(&ScenarioCatalog::builtin()).unwrap();
        let mut catalog: ScenarioCatalog = toml::from_str(&toml_text).unwrap();
        assert_eq!(catalog, ScenarioCatalog::builtin());

        let mut bundle = catalog.get(GAS_LEAK).unwrap().clone();
        bundle.zone_updates[0].zone = "zone-e".into();
        bundle.sensor_overrides.clear();
        catalog.insert("cooling_leak", bundle);

        let mut store = Store::demo();
        catalog.trigger("cooling_leak", &mut store, Utc::now()).unwrap();
        assert_eq!(store.zone("zone-e").unwrap().status(), Level::Danger);
    }

    #[test]
    fn test_validate_rejects_bad_confidence() {
        let mut catalog = ScenarioCatalog::builtin();
        let mut bundle = catalog.get(FIRE).unwrap().clone();
        if let Some(d) = bundle.detection.as_mut() {
            d.confidence = 1.5;
        }
        catalog.insert(FIRE, bundle);
        assert!(matches!(catalog.validate(), Err(ConfigError::Scenario(id, _)) if id == FIRE));
    }
}
