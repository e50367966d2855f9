// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! PlantWatch - power-plant safety monitoring core
//!
//! The simulation and alerting state engine behind a plant safety dashboard:
//! - Entity store for zones, sensors, cameras, workers, alerts and detections
//! - Threshold classification of sensor readings
//! - Sensor drift and synthetic vision-feed simulation
//! - Scripted scenario injection (gas leak, fire, fallen worker, no helmet)
//! - Alert lifecycle with KPI counters
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      PlantWatch Engine                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌──────────┐  ┌─────────┐  │
//! │  │  Drift    │  │  Vision   │  │ Scenario │  │  View   │  │
//! │  │ Simulator │  │   Feed    │  │ Catalog  │  │ commands│  │
//! │  └───────────┘  └───────────┘  └──────────┘  └─────────┘  │
//! │        ↓              ↓             ↓             ↓       │
//! │  ┌────────────────────────────────────────────────────┐   │
//! │  │        Store (single writer, RwLock-guarded)        │   │
//! │  └────────────────────────────────────────────────────┘   │
//! │                           ↓                               │
//! │  ┌────────────────────────────────────────────────────┐   │
//! │  │                     Event Bus                       │   │
//! │  └────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod config;
pub mod core;
pub mod detection;
pub mod guide;
pub mod plant;
pub mod scenarios;
pub mod sensors;

// Re-exports for convenience
pub use alerts::{Alert, AlertStatus, KpiData, Severity};
pub use config::Config;
pub use core::{Engine, EventBus, Snapshot, Store, StoreEvent};
pub use detection::{Detection, DetectionBuffer, DetectionClass};
pub use scenarios::ScenarioCatalog;
pub use sensors::{classify, Level, Sensor, SensorKind, Thresholds};

/// PlantWatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PlantWatch name
pub const NAME: &str = "PlantWatch";
