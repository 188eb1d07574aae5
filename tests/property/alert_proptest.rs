//! Property-based tests for alert mapping and ordering

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use salama::shared::alert::{arrange_alerts, to_display_alerts, AlertKind, AlertRecord, AlertSort};

fn record(id: i64, severity: String, offset_secs: i64) -> AlertRecord {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    AlertRecord {
        id,
        camera_id: id % 4,
        severity,
        message: format!("alert {}", id),
        created_at: (base + Duration::seconds(offset_secs)).to_rfc3339(),
        object_detected: None,
    }
}

proptest! {
    #[test]
    fn test_severity_mapping_is_total_and_exact(severity in ".*") {
        let expected = match severity.as_str() {
            "High" => AlertKind::Critical,
            "Medium" => AlertKind::Warning,
            _ => AlertKind::Info,
        };
        prop_assert_eq!(AlertKind::from_severity(&severity), expected);
    }

    #[test]
    fn test_display_sequence_is_most_recent_first_and_stable(
        offsets in prop::collection::vec(0i64..50, 0..40),
    ) {
        let records: Vec<AlertRecord> = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| record(i as i64, "Low".to_string(), *offset))
            .collect();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let alerts = to_display_alerts(records, now);

        prop_assert_eq!(alerts.len(), offsets.len());
        for pair in alerts.windows(2) {
            prop_assert!(pair[0].raw_date >= pair[1].raw_date);
            if pair[0].raw_date == pair[1].raw_date {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn test_kind_filter_keeps_only_that_kind(
        severities in prop::collection::vec(prop::sample::select(vec!["High", "Medium", "Low", "high", ""]), 0..30),
    ) {
        let records: Vec<AlertRecord> = severities
            .iter()
            .enumerate()
            .map(|(i, s)| record(i as i64, s.to_string(), i as i64))
            .collect();
        let alerts = to_display_alerts(records, Utc::now());

        for kind in [AlertKind::Critical, AlertKind::Warning, AlertKind::Info] {
            let filtered = arrange_alerts(&alerts, Some(kind), AlertSort::Time);
            prop_assert!(filtered.iter().all(|a| a.kind == kind));
            prop_assert_eq!(filtered.len(), alerts.iter().filter(|a| a.kind == kind).count());
        }
    }
}
