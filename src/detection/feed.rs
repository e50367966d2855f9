// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Synthetic vision feed for demo mode

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::{BoundingBox, Detection, DetectionClass};
use crate::plant::Camera;

/// Classes the synthetic feed cycles through
const FEED_CLASSES: [DetectionClass; 4] = [
    DetectionClass::Person,
    DetectionClass::Helmet,
    DetectionClass::NoHelmet,
    DetectionClass::Smoke,
];

/// Emits one random inference per tick from a random camera.
pub struct VisionFeed {
    rng: ChaCha8Rng,
}

impl VisionFeed {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Produce the next inference. Returns `None` when there are no cameras.
    pub fn sample(&mut self, cameras: &[Camera], now: DateTime<Utc>) -> Option<Detection> {
        let camera = cameras.choose(&mut self.rng)?;
        let class = *FEED_CLASSES.choose(&mut self.rng)?;

        let confidence = 0.85 + self.rng.gen::<f64>() * 0.14;
        let bbox = BoundingBox::new(
            self.rng.gen_range(0.0..200.0),
            self.rng.gen_range(0.0..150.0),
            self.rng.gen_range(40.0..80.0),
            self.rng.gen_range(60.0..120.0),
        );

        Some(Detection::new(&camera.id, class, confidence, bbox, now))
    }

    /// Next inference, kept only when it is anomalous
    pub fn sample_anomaly(&mut self, cameras: &[Camera], now: DateTime<Utc>) -> Option<Detection> {
        self.sample(cameras, now).filter(|d| d.is_anomaly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::CameraStatus;

    fn cameras() -> Vec<Camera> {
        vec![
            Camera::new("cam-001", "CAM-A01", "zone-a", CameraStatus::Online, "Boiler house 1F"),
            Camera::new("cam-003", "CAM-B01", "zone-b", CameraStatus::Online, "Turbine hall"),
        ]
    }

    #[test]
    fn test_feed_ranges() {
        let mut feed = VisionFeed::new(Some(7));
        let cams = cameras();
        for _ in 0..200 {
            let d = feed.sample(&cams, Utc::now()).unwrap();
            assert!((0.85..=0.99).contains(&d.confidence));
            assert!(d.bbox.x < 200.0 && d.bbox.y < 150.0);
            assert!((40.0..80.0).contains(&d.bbox.width));
            assert!((60.0..120.0).contains(&d.bbox.height));
            assert!(FEED_CLASSES.contains(&d.class));
        }
    }

    #[test]
    fn test_sample_anomaly_filters() {
        let mut feed = VisionFeed::new(Some(11));
        let cams = cameras();
        let mut seen = 0;
        for _ in 0..100 {
            if let Some(d) = feed.sample_anomaly(&cams, Utc::now()) {
                assert!(matches!(d.class, DetectionClass::NoHelmet | DetectionClass::Smoke));
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_seeded_feed_is_deterministic() {
        let cams = cameras();
        let now = Utc::now();
        let mut a = VisionFeed::new(Some(42));
        let mut b = VisionFeed::new(Some(42));
        for _ in 0..10 {
            let (da, db) = (a.sample(&cams, now).unwrap(), b.sample(&cams, now).unwrap());
            assert_eq!(da.class, db.class);
            assert_eq!(da.camera_id, db.camera_id);
            assert_eq!(da.bbox, db.bbox);
        }
    }

    #[test]
    fn test_no_cameras() {
        let mut feed = VisionFeed::new(Some(1));
        assert!(feed.sample(&[], Utc::now()).is_none());
    }
}
