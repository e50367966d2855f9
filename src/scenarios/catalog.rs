//! Built-in demo incidents

use std::collections::BTreeMap;

use super::{AlertTemplate, DetectionTemplate, ScenarioBundle, SensorOverride, ZoneUpdate};
use crate::alerts::{AlertKind, AlertSource, Severity};
use crate::detection::{BoundingBox, DetectionClass};
use crate::sensors::Level;

pub const GAS_LEAK: &str = "gas_leak";
pub const FIRE: &str = "fire";
pub const FALLEN_WORKER: &str = "fallen_worker";
pub const NO_HELMET: &str = "no_helmet";

fn text(lines: &[&str]) -> String {
    lines.join("\n")
}

pub(super) fn builtin() -> BTreeMap<String, ScenarioBundle> {
    let mut scenarios = BTreeMap::new();

    scenarios.insert(
        GAS_LEAK.to_string(),
        ScenarioBundle {
            name: "Gas leak".into(),
            description: "Gas leak detected at the Zone D fuel storage tanks".into(),
            zone_updates: vec![ZoneUpdate {
                zone: "zone-d".into(),
                status: Level::Danger,
                risk_level: 95,
            }],
            sensor_overrides: vec![SensorOverride {
                sensor: "sensor-008".into(),
                value: 150.0,
            }],
            alert: AlertTemplate {
                kind: AlertKind::Safety,
                severity: Severity::Critical,
                title: "URGENT: gas leak detected in Zone D!".into(),
                description: "A severe gas leak was detected at the Zone D fuel storage tank. Immediate evacuation required."
                    .into(),
                zone: "zone-d".into(),
                source: AlertSource::Sensor,
                recommendation: text(&[
                    "🚨 Emergency evacuation",
                    "",
                    "1. Evacuate all Zone D workers immediately",
                    "2. Wind: north-westerly - evacuate through gate 3",
                    "3. Gas masks mandatory",
                    "4. Close the emergency gas shut-off valves",
                    "5. Run ventilation at maximum",
                ]),
            },
            detection: None,
        },
    );

    scenarios.insert(
        FIRE.to_string(),
        ScenarioBundle {
            name: "Fire".into(),
            description: "Smoke detected in the Zone B turbine hall".into(),
            zone_updates: vec![ZoneUpdate {
                zone: "zone-b".into(),
                status: Level::Danger,
                risk_level: 90,
            }],
            sensor_overrides: vec![],
            alert: AlertTemplate {
                kind: AlertKind::Safety,
                severity: Severity::Critical,
                title: "URGENT: fire detected in Zone B!".into(),
                description: "Smoke and fire were detected in the Zone B turbine hall.".into(),
                zone: "zone-b".into(),
                source: AlertSource::VisionAi,
                recommendation: text(&[
                    "🔥 Fire response",
                    "",
                    "1. Raise the fire alarm",
                    "2. Cut power to Zone B",
                    "3. Confirm the automatic extinguishing system triggered",
                    "4. Evacuation route: east emergency exit",
                    "5. Call the fire department (119)",
                ]),
            },
            detection: Some(DetectionTemplate {
                camera: "cam-003".into(),
                class: DetectionClass::Smoke,
                label: "Smoke detected".into(),
                confidence: 0.94,
                bbox: BoundingBox::new(150.0, 50.0, 100.0, 80.0),
            }),
        },
    );

    scenarios.insert(
        FALLEN_WORKER.to_string(),
        ScenarioBundle {
            name: "Fallen worker".into(),
            description: "A worker collapsed at the Zone C substation".into(),
            zone_updates: vec![],
            sensor_overrides: vec![],
            alert: AlertTemplate {
                kind: AlertKind::Safety,
                severity: Severity::Critical,
                title: "URGENT: fallen worker detected in Zone C!".into(),
                description: "A worker appears to have collapsed at the Zone C substation. Immediate check required."
                    .into(),
                zone: "zone-c".into(),
                source: AlertSource::VisionAi,
                recommendation: text(&[
                    "🏥 Medical emergency",
                    "",
                    "1. Nearest worker to check on site",
                    "2. Check consciousness and breathing",
                    "3. Call the medical team",
                    "4. AED: Zone C entrance (20 m)",
                    "5. Call 119 and request an ambulance",
                ]),
            },
            detection: Some(DetectionTemplate {
                camera: "cam-005".into(),
                class: DetectionClass::FallenPerson,
                label: "Fallen worker".into(),
                confidence: 0.91,
                bbox: BoundingBox::new(180.0, 200.0, 80.0, 40.0),
            }),
        },
    );

    scenarios.insert(
        NO_HELMET.to_string(),
        ScenarioBundle {
            name: "No helmet".into(),
            description: "Worker without a helmet in the Zone A boiler house".into(),
            zone_updates: vec![],
            sensor_overrides: vec![],
            alert: AlertTemplate {
                kind: AlertKind::Safety,
                severity: Severity::Warning,
                title: "Zone A worker without helmet".into(),
                description: "A worker not wearing a helmet was detected in the Zone A boiler house.".into(),
                zone: "zone-a".into(),
                source: AlertSource::VisionAi,
                recommendation: text(&[
                    "⛑️ Missing helmet",
                    "",
                    "1. Announce a reminder to the worker immediately",
                    "2. Dispatch the on-site safety manager",
                    "3. Issue a helmet and confirm it is worn",
                    "4. Require safety training on repeat violations",
                ]),
            },
            detection: Some(DetectionTemplate {
                camera: "cam-001".into(),
                class: DetectionClass::NoHelmet,
                label: "No helmet".into(),
                confidence: 0.89,
                bbox: BoundingBox::new(100.0, 90.0, 45.0, 45.0),
            }),
        },
    );

    scenarios
}
