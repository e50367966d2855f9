// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Threshold classification of sensor readings

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status band of a sensor (and of a zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Normal,
    Caution,
    Danger,
}

impl Level {
    /// Display color used by the dashboard for this band
    pub fn color(self) -> &'static str {
        match self {
            Level::Normal => "#10B981",
            Level::Caution => "#F59E0B",
            Level::Danger => "#EF4444",
        }
    }
}

/// Threshold triple. Bounds must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub normal: f64,
    pub caution: f64,
    pub danger: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("threshold bounds must be finite (normal={normal}, caution={caution}, danger={danger})")]
    NonFinite { normal: f64, caution: f64, danger: f64 },

    #[error("threshold bounds must be strictly increasing (normal={normal}, caution={caution}, danger={danger})")]
    NotIncreasing { normal: f64, caution: f64, danger: f64 },
}

impl Thresholds {
    pub const fn new(normal: f64, caution: f64, danger: f64) -> Self {
        Self { normal, caution, danger }
    }

    /// Reject triples the classifier cannot give a meaningful answer for.
    ///
    /// `classify` itself never reorders bounds: with a malformed triple the
    /// `danger` comparison simply wins first.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let Self { normal, caution, danger } = *self;
        if !(normal.is_finite() && caution.is_finite() && danger.is_finite()) {
            return Err(ThresholdError::NonFinite { normal, caution, danger });
        }
        if !(normal < caution && caution < danger) {
            return Err(ThresholdError::NotIncreasing { normal, caution, danger });
        }
        Ok(())
    }
}

/// Map a reading onto its status band.
pub fn classify(value: f64, thresholds: &Thresholds) -> Level {
    if value >= thresholds.danger {
        Level::Danger
    } else if value >= thresholds.caution {
        Level::Caution
    } else {
        Level::Normal
    }
}
