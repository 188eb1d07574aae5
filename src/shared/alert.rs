//! Alert Data Structures
//!
//! `AlertRecord` is the backend wire shape; `DisplayAlert` is the derived,
//! UI-facing model. A fetch maps every record once and produces a fresh,
//! most-recent-first sequence.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Actions offered on every alert card
pub const ALERT_ACTIONS: &[&str] = &["Acknowledge", "View Details"];

/// Fallback for alerts without a detected object
pub const UNSPECIFIED_OBJECT: &str = "Unspecified Object";

/// Alert as returned by `GET /alerts/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    pub camera_id: i64,
    /// "High", "Medium", "Low" or any other backend string
    pub severity: String,
    pub message: String,
    /// ISO-8601 timestamp, with or without offset
    pub created_at: String,
    #[serde(default)]
    pub object_detected: Option<String>,
}

/// UI category of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Warning,
    Info,
}

impl AlertKind {
    /// Exact, case-sensitive match; everything unrecognised is `Info`.
    pub fn from_severity(severity: &str) -> Self {
        match severity {
            "High" => AlertKind::Critical,
            "Medium" => AlertKind::Warning,
            _ => AlertKind::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Critical => "critical",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        }
    }

    /// Higher is more urgent
    pub fn priority(&self) -> u8 {
        match self {
            AlertKind::Critical => 3,
            AlertKind::Warning => 2,
            AlertKind::Info => 1,
        }
    }
}

/// Alert ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayAlert {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub camera_id: i64,
    pub severity: String,
    pub message: String,
    /// "Camera {camera_id}"
    pub location: String,
    /// Humanized relative time, e.g. "5 min ago"
    pub timestamp: String,
    /// Local wall-clock rendering of `created_at`
    pub full_timestamp: String,
    /// Parsed `created_at`; `None` when the backend sent something unparsable
    #[serde(skip)]
    pub raw_date: Option<DateTime<Utc>>,
    pub details: String,
    pub object_detected: String,
    pub actions: &'static [&'static str],
}

impl DisplayAlert {
    /// Derive the display model relative to `now`
    pub fn from_record(record: AlertRecord, now: DateTime<Utc>) -> Self {
        let raw_date = parse_timestamp(&record.created_at);
        let (timestamp, full_timestamp) = match raw_date {
            Some(date) => (
                format_time_difference(date, now),
                date.with_timezone(&Local).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            ),
            None => ("unknown".to_string(), record.created_at.clone()),
        };
        let object_detected = record
            .object_detected
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_OBJECT.to_string());

        Self {
            id: record.id,
            kind: AlertKind::from_severity(&record.severity),
            camera_id: record.camera_id,
            location: format!("Camera {}", record.camera_id),
            timestamp,
            full_timestamp,
            raw_date,
            details: record.message.clone(),
            message: record.message,
            severity: record.severity,
            object_detected,
            actions: ALERT_ACTIONS,
        }
    }
}

/// Map a page of backend records and order it most-recent-first.
///
/// The sort is stable, so alerts with equal timestamps keep backend order.
/// Alerts with an unparsable timestamp sink to the end.
pub fn to_display_alerts(records: Vec<AlertRecord>, now: DateTime<Utc>) -> Vec<DisplayAlert> {
    let mut alerts: Vec<DisplayAlert> = records
        .into_iter()
        .map(|record| DisplayAlert::from_record(record, now))
        .collect();
    alerts.sort_by(by_recency);
    alerts
}

fn by_recency(a: &DisplayAlert, b: &DisplayAlert) -> Ordering {
    b.raw_date.cmp(&a.raw_date)
}

/// Backend timestamps come either as RFC 3339 or as naive ISO-8601, which
/// is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Human-readable distance between `date` and `now`.
pub fn format_time_difference(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 5 {
        return "now".to_string();
    }
    if seconds < 60 {
        return format!("{} sec ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} min ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hr ago", hours);
    }
    format!("{} day ago", hours / 24)
}

/// Sort orders offered on the alerts page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertSort {
    #[default]
    Time,
    Priority,
    Location,
}

/// Filter and reorder an already-fetched sequence without touching it.
///
/// `kind = None` keeps every alert. All sorts are stable.
pub fn arrange_alerts(alerts: &[DisplayAlert], kind: Option<AlertKind>, sort: AlertSort) -> Vec<DisplayAlert> {
    let mut arranged: Vec<DisplayAlert> = alerts
        .iter()
        .filter(|alert| kind.map_or(true, |k| alert.kind == k))
        .cloned()
        .collect();
    match sort {
        AlertSort::Time => arranged.sort_by(by_recency),
        AlertSort::Priority => arranged.sort_by(|a, b| b.kind.priority().cmp(&a.kind.priority())),
        AlertSort::Location => arranged.sort_by(|a, b| a.location.cmp(&b.location)),
    }
    arranged
}

/// Per-category counts for the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertSummary {
    pub fn of(alerts: &[DisplayAlert]) -> Self {
        alerts.iter().fold(Self::default(), |mut summary, alert| {
            match alert.kind {
                AlertKind::Critical => summary.critical += 1,
                AlertKind::Warning => summary.warning += 1,
                AlertKind::Info => summary.info += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}
