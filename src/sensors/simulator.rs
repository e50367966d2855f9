// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor drift simulator for demo/testing

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Uniform;
use tracing::trace;

use crate::config::MAX_ROUND_DECIMALS;
use crate::core::Store;

/// Perturbs every sensor reading by bounded uniform noise.
///
/// Each tick draws `delta ∈ [-amplitude/2, amplitude/2)` per sensor, clamps
/// the result at zero and rounds to `decimals` places (at most
/// [`MAX_ROUND_DECIMALS`]) before writing it back through the store.
pub struct DriftSimulator {
    rng: ChaCha8Rng,
    noise: Uniform<f64>,
    decimals: u32,
    ticks: u64,
}

impl DriftSimulator {
    pub fn new(amplitude: f64, decimals: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let half = (amplitude.abs() / 2.0).max(f64::EPSILON);

        Self {
            rng,
            noise: Uniform::new(-half, half),
            decimals: decimals.min(MAX_ROUND_DECIMALS),
            ticks: 0,
        }
    }

    /// Next value for a sensor currently reading `current`
    pub fn drift(&mut self, current: f64) -> f64 {
        let delta = self.noise.sample(&mut self.rng);
        round_to((current + delta).max(0.0), self.decimals)
    }

    /// Advance every sensor by one step. Returns the ids of the sensors the
    /// store accepted a new reading for.
    pub fn tick(&mut self, store: &mut Store) -> Vec<String> {
        let targets: Vec<(String, f64)> = store
            .sensors()
            .iter()
            .map(|s| (s.id.clone(), s.current_value()))
            .collect();

        let mut written = Vec::with_capacity(targets.len());
        for (id, current) in targets {
            let next = self.drift(current);
            if store.update_sensor_value(&id, next) {
                written.push(id);
            }
        }

        self.ticks += 1;
        trace!("Drift tick {} wrote {} sensors", self.ticks, written.len());
        written
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
