//! Demo plant: six zones, nine cameras, eight sensors, five workers

use chrono::{DateTime, Duration, Utc};

use super::{
    Camera, CameraStatus, NetworkStatus, Position, SafetyGear, SensorAiStatus, ServiceStatus, SystemStatus,
    VisionAiStatus, Worker, WorkerStatus, Zone,
};
use crate::alerts::{Alert, AlertKind, AlertSource, AlertStatus, KpiData, Severity};
use crate::detection::{BoundingBox, Detection, DetectionClass};
use crate::sensors::{Level, Sensor, SensorKind, Thresholds};

const GAS: Thresholds = Thresholds::new(25.0, 50.0, 100.0);
const TEMPERATURE: Thresholds = Thresholds::new(60.0, 80.0, 100.0);
const VIBRATION: Thresholds = Thresholds::new(4.5, 7.0, 10.0);
const DUST: Thresholds = Thresholds::new(50.0, 100.0, 150.0);
const HUMIDITY: Thresholds = Thresholds::new(70.0, 85.0, 95.0);

pub fn zones() -> Vec<Zone> {
    vec![
        Zone::new("zone-a", "Zone A", "Boiler house", Level::Normal, 15, Position::new(10.0, 10.0)),
        Zone::new("zone-b", "Zone B", "Turbine hall", Level::Caution, 45, Position::new(40.0, 10.0)),
        Zone::new("zone-c", "Zone C", "Substation", Level::Normal, 20, Position::new(70.0, 10.0)),
        Zone::new("zone-d", "Zone D", "Fuel storage", Level::Danger, 78, Position::new(10.0, 50.0)),
        Zone::new("zone-e", "Zone E", "Cooling tower", Level::Normal, 12, Position::new(40.0, 50.0)),
        Zone::new("zone-f", "Zone F", "Administration", Level::Normal, 5, Position::new(70.0, 50.0)),
    ]
}

pub fn cameras() -> Vec<Camera> {
    use CameraStatus::*;
    vec![
        Camera::new("cam-001", "CAM-A01", "zone-a", Online, "Boiler house 1F entrance"),
        Camera::new("cam-002", "CAM-A02", "zone-a", Online, "Boiler house 2F main hall"),
        Camera::new("cam-003", "CAM-B01", "zone-b", Online, "Turbine hall main turbine room"),
        Camera::new("cam-004", "CAM-B02", "zone-b", Online, "Turbine hall control room"),
        Camera::new("cam-005", "CAM-C01", "zone-c", Online, "Main substation room"),
        Camera::new("cam-006", "CAM-D01", "zone-d", Online, "Fuel tank A"),
        Camera::new("cam-007", "CAM-D02", "zone-d", Online, "Fuel tank B"),
        Camera::new("cam-008", "CAM-E01", "zone-e", Online, "Cooling tower exterior"),
        Camera::new("cam-009", "CAM-F01", "zone-f", Offline, "Administration lobby"),
    ]
}

pub fn sensors() -> Vec<Sensor> {
    use SensorKind::*;
    vec![
        Sensor::new("sensor-001", "Gas-A01", Gas, "zone-a", Position::new(15.0, 15.0), 12.0, GAS),
        Sensor::new("sensor-002", "Temp-A02", Temperature, "zone-a", Position::new(20.0, 20.0), 42.0, TEMPERATURE),
        Sensor::new("sensor-003", "Vibration-B01", Vibration, "zone-b", Position::new(45.0, 15.0), 3.2, VIBRATION),
        Sensor::new("sensor-004", "Gas-D01", Gas, "zone-d", Position::new(15.0, 55.0), 68.0, GAS),
        Sensor::new("sensor-005", "Temp-D02", Temperature, "zone-d", Position::new(20.0, 60.0), 85.0, TEMPERATURE),
        Sensor::new("sensor-006", "Dust-E01", Dust, "zone-e", Position::new(45.0, 55.0), 35.0, DUST),
        Sensor::new("sensor-007", "Humidity-C01", Humidity, "zone-c", Position::new(75.0, 15.0), 45.0, HUMIDITY),
        Sensor::new("sensor-008", "Gas-D03", Gas, "zone-d", Position::new(25.0, 55.0), 92.0, GAS),
    ]
}

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert::new(
            AlertKind::Safety,
            Severity::Critical,
            "Suspected gas leak in Zone D",
            "Gas concentration around the Zone D fuel tanks has reached the danger level. Immediate inspection required.",
            "zone-d",
            AlertSource::Sensor,
            now - Duration::minutes(2),
        )
        .with_id("alert-001")
        .with_recommendation(
            "1. Evacuate all Zone D workers immediately\n2. Check the gas shut-off valves\n3. Start the ventilation system\n4. Inspect wearing gas masks",
        ),
        Alert::new(
            AlertKind::Safety,
            Severity::Warning,
            "Zone B worker without helmet",
            "CAM-B01 detected a worker not wearing a helmet.",
            "zone-b",
            AlertSource::VisionAi,
            now - Duration::minutes(5),
        )
        .with_id("alert-002")
        .with_status(AlertStatus::Acknowledged)
        .with_recommendation("Instruct the worker to wear a helmet; recommend safety training on repeat violations."),
        Alert::new(
            AlertKind::Environment,
            Severity::Warning,
            "Zone D temperature rising",
            "Zone D temperature exceeded the caution level (80°C). Currently 85°C.",
            "zone-d",
            AlertSource::Sensor,
            now - Duration::minutes(10),
        )
        .with_id("alert-003")
        .with_status(AlertStatus::Acknowledged),
        Alert::new(
            AlertKind::Equipment,
            Severity::Info,
            "CAM-F01 offline",
            "The administration lobby camera is offline. Check the network connection.",
            "zone-f",
            AlertSource::Manual,
            now - Duration::minutes(30),
        )
        .with_id("alert-004")
        .with_status(AlertStatus::Resolved),
    ]
}

pub fn workers() -> Vec<Worker> {
    let worker = |id: &str, name: &str, role: &str, zone: &str, status, x, y, safety_gear| Worker {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        zone: zone.to_string(),
        status,
        position: Position::new(x, y),
        safety_gear,
    };

    vec![
        worker("worker-001", "Kim Cheolsu", "Equipment inspector", "zone-a", WorkerStatus::Active, 18.0, 18.0, SafetyGear::FULL),
        worker(
            "worker-002",
            "Lee Younghee",
            "Turbine operator",
            "zone-b",
            WorkerStatus::Active,
            45.0,
            20.0,
            SafetyGear { helmet: false, ..SafetyGear::FULL },
        ),
        worker("worker-003", "Park Minsu", "Safety manager", "zone-d", WorkerStatus::Active, 15.0, 58.0, SafetyGear::FULL),
        worker(
            "worker-004",
            "Jung Sujin",
            "Electrical technician",
            "zone-c",
            WorkerStatus::Break,
            72.0,
            18.0,
            SafetyGear { gloves: false, ..SafetyGear::FULL },
        ),
        worker("worker-005", "Choi Donghun", "Boiler engineer", "zone-a", WorkerStatus::Active, 22.0, 15.0, SafetyGear::FULL),
    ]
}

pub fn kpi() -> KpiData {
    KpiData {
        accident_free_days: 365,
        today_detections: 12,
        resolved_alerts: 8,
        pending_alerts: 4,
        overall_risk_level: 32,
        ai_accuracy: 98.5,
        response_time: 0.5,
        false_alarm_rate: 4.2,
    }
}

pub fn system_status() -> SystemStatus {
    SystemStatus {
        vision_ai: VisionAiStatus {
            status: ServiceStatus::Online,
            processed_frames: 1_247_832,
            detection_count: 3_421,
        },
        sensor_ai: SensorAiStatus {
            status: ServiceStatus::Online,
            active_sensors: 7,
            total_sensors: 8,
        },
        network: NetworkStatus {
            status: ServiceStatus::Online,
            latency_ms: 12,
        },
    }
}

/// Newest first
pub fn detections(now: DateTime<Utc>) -> Vec<Detection> {
    vec![
        Detection::new("cam-003", DetectionClass::Person, 0.95, BoundingBox::new(120.0, 80.0, 60.0, 150.0), now)
            .with_label("Worker"),
        Detection::new("cam-003", DetectionClass::Helmet, 0.92, BoundingBox::new(130.0, 80.0, 40.0, 40.0), now),
        Detection::new("cam-004", DetectionClass::NoHelmet, 0.88, BoundingBox::new(200.0, 100.0, 50.0, 40.0), now),
    ]
}
