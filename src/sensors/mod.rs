//! Sensor module - entities, threshold classification and drift simulation

mod classifier;
mod simulator;
mod types;

pub use classifier::{classify, Level, ThresholdError, Thresholds};
pub use simulator::DriftSimulator;
pub use types::{Sensor, SensorKind};
