//! Bounded most-recent-first detection history

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use super::Detection;

pub const DEFAULT_CAPACITY: usize = 50;
pub const DEFAULT_MAX_AGE_SECS: u64 = 60;

/// Newest detection sits at index 0; the oldest are evicted on overflow.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DetectionBuffer {
    #[serde(skip)]
    capacity: usize,
    items: VecDeque<Detection>,
}

impl DetectionBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Seed from a newest-first list, keeping at most `capacity` entries.
    pub fn from_recent(capacity: usize, detections: Vec<Detection>) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.items.extend(detections.into_iter().take(buffer.capacity));
        buffer
    }

    pub fn push(&mut self, detection: Detection) {
        self.items.push_front(detection);
        self.items.truncate(self.capacity);
    }

    /// Drop entries at least `max_age` old relative to `now`. Returns how
    /// many were removed.
    pub fn clear_older_than(&mut self, now: DateTime<Utc>, max_age: Duration) -> usize {
        let before = self.items.len();
        self.items.retain(|d| now - d.timestamp < max_age);
        before - self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&Detection> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<Detection> {
        self.items.iter().cloned().collect()
    }
}

impl Default for DetectionBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
