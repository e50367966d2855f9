// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Alerts - incident log entries, their lifecycle and the KPI counters they drive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Safety,
    Environment,
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    VisionAi,
    Sensor,
    Manual,
}

/// Lifecycle: `New -> Acknowledged -> Resolved`, with `New -> Resolved`
/// allowed directly. `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        use AlertStatus::*;
        matches!(
            (self, next),
            (New, Acknowledged) | (New, Resolved) | (Acknowledged, Resolved)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == AlertStatus::Resolved
    }
}

/// A logged incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub zone: String,
    pub source: AlertSource,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_recommendation: Option<String>,
}

impl Alert {
    /// Fresh `New` alert with a unique id
    pub fn new(
        kind: AlertKind,
        severity: Severity,
        title: &str,
        description: &str,
        zone: &str,
        source: AlertSource,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("alert-{}", uuid::Uuid::new_v4().simple()),
            kind,
            severity,
            title: title.to_string(),
            description: description.to_string(),
            zone: zone.to_string(),
            source,
            timestamp,
            status: AlertStatus::New,
            ai_recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, text: &str) -> Self {
        self.ai_recommendation = Some(text.to_string());
        self
    }

    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Not yet resolved
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Apply a lifecycle transition. Returns the previous status when the
    /// transition was legal and applied.
    pub fn transition(&mut self, next: AlertStatus) -> Option<AlertStatus> {
        if !self.status.can_transition_to(next) {
            return None;
        }
        let previous = self.status;
        self.status = next;
        Some(previous)
    }
}

/// Aggregate counters shown on the dashboard.
///
/// `pending_alerts` and `resolved_alerts` move incrementally from a
/// baseline: raising an alert adds one pending, resolving moves one from
/// pending to resolved. Acknowledging touches neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiData {
    pub accident_free_days: u32,
    pub today_detections: u32,
    pub resolved_alerts: u32,
    pub pending_alerts: u32,
    pub overall_risk_level: u8,
    pub ai_accuracy: f64,
    /// Seconds
    pub response_time: f64,
    /// Percent
    pub false_alarm_rate: f64,
}

impl Default for KpiData {
    fn default() -> Self {
        Self {
            accident_free_days: 0,
            today_detections: 0,
            resolved_alerts: 0,
            pending_alerts: 0,
            overall_risk_level: 0,
            ai_accuracy: 0.0,
            response_time: 0.0,
            false_alarm_rate: 0.0,
        }
    }
}

impl KpiData {
    /// Counted for every raised alert regardless of severity
    pub fn record_raised(&mut self) {
        self.today_detections = self.today_detections.saturating_add(1);
        self.pending_alerts = self.pending_alerts.saturating_add(1);
    }

    pub fn record_transition(&mut self, next: AlertStatus) {
        if next == AlertStatus::Resolved {
            self.resolved_alerts = self.resolved_alerts.saturating_add(1);
            self.pending_alerts = self.pending_alerts.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Alert {
        Alert::new(
            AlertKind::Safety,
            Severity::Warning,
            "t",
            "d",
            "zone-a",
            AlertSource::Manual,
            Utc::now(),
        )
    }

    #[test]
    fn test_transition_table() {
        use AlertStatus::*;
        assert!(New.can_transition_to(Acknowledged));
        assert!(New.can_transition_to(Resolved));
        assert!(Acknowledged.can_transition_to(Resolved));

        assert!(!New.can_transition_to(New));
        assert!(!Acknowledged.can_transition_to(New));
        assert!(!Acknowledged.can_transition_to(Acknowledged));
        assert!(!Resolved.can_transition_to(New));
        assert!(!Resolved.can_transition_to(Acknowledged));
        assert!(!Resolved.can_transition_to(Resolved));
    }

    #[test]
    fn test_resolved_is_terminal() {
        let mut a = alert();
        assert_eq!(a.transition(AlertStatus::Resolved), Some(AlertStatus::New));
        assert!(!a.is_active());
        assert_eq!(a.transition(AlertStatus::Acknowledged), None);
        assert_eq!(a.transition(AlertStatus::Resolved), None);
        assert_eq!(a.status, AlertStatus::Resolved);
    }

    #[test]
    fn test_kpi_counters() {
        let mut kpi = KpiData::default();
        kpi.record_raised();
        kpi.record_raised();
        assert_eq!((kpi.today_detections, kpi.pending_alerts), (2, 2));

        kpi.record_transition(AlertStatus::Acknowledged);
        assert_eq!((kpi.pending_alerts, kpi.resolved_alerts), (2, 0));

        kpi.record_transition(AlertStatus::Resolved);
        assert_eq!((kpi.pending_alerts, kpi.resolved_alerts), (1, 1));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&AlertSource::VisionAi).unwrap(), "\"vision_ai\"");
        assert_eq!(serde_json::to_string(&AlertStatus::Acknowledged).unwrap(), "\"acknowledged\"");
    }
}
