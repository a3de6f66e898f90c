//! Back-office agenda events.

use chrono::{Duration, NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

pub const MAX_TITLE_LENGTH: usize = 200;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const DEFAULT_UPCOMING_LIMIT: i64 = 5;

pub const VALID_TYPES: &[&str] = &[
    "meeting",
    "exhibition",
    "delivery",
    "pickup",
    "deadline",
    "workshop",
    "personal",
    "other",
];

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[STATUS_SCHEDULED, STATUS_COMPLETED, STATUS_CANCELLED];

pub const VALID_RECURRENCE_PATTERNS: &[&str] = &["daily", "weekly", "monthly", "yearly"];

pub const VALID_PARTICIPANT_STATUSES: &[&str] = &["pending", "confirmed", "declined"];

/// Calendar color used when an event has none of its own.
pub fn default_color(event_type: &str) -> &'static str {
    match event_type {
        "meeting" => "#3B82F6",
        "exhibition" => "#8B5CF6",
        "delivery" => "#10B981",
        "pickup" => "#14B8A6",
        "deadline" => "#EF4444",
        "workshop" => "#F97316",
        "personal" => "#6B7280",
        _ => "#d4af37",
    }
}

/// `[start, end)` of the UTC day containing `now`.
pub fn day_bounds(now: Timestamp) -> (Timestamp, Timestamp) {
    let start = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}

pub fn validate_type(event_type: &str) -> Result<(), String> {
    crate::validation::validate_choice("event type", event_type, VALID_TYPES)
}

pub fn validate_status(status: &str) -> Result<(), String> {
    crate::validation::validate_choice("event status", status, VALID_STATUSES)
}

/// An event must not end before it starts.
pub fn validate_time_range(start: Timestamp, end: Timestamp) -> Result<(), String> {
    if end < start {
        Err("End date must be after start date".to_string())
    } else {
        Ok(())
    }
}

/// Participants are a JSON array of objects; a `status`, when given, must be
/// one of [`VALID_PARTICIPANT_STATUSES`].
pub fn validate_participants(participants: &serde_json::Value) -> Result<(), String> {
    let list = participants
        .as_array()
        .ok_or_else(|| "Participants must be a list".to_string())?;
    for participant in list {
        let entry = participant
            .as_object()
            .ok_or_else(|| "Each participant must be an object".to_string())?;
        if let Some(status) = entry.get("status") {
            let status = status
                .as_str()
                .ok_or_else(|| "Participant status must be a string".to_string())?;
            crate::validation::validate_choice(
                "participant status",
                status,
                VALID_PARTICIPANT_STATUSES,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap()
    }

    #[test]
    fn colors_by_type() {
        assert_eq!(default_color("deadline"), "#EF4444");
        assert_eq!(default_color("other"), "#d4af37");
        assert_eq!(default_color("unknown"), "#d4af37");
    }

    #[test]
    fn day_bounds_are_midnight_to_midnight() {
        let (start, end) = day_bounds(at(10, 15));
        assert_eq!(start, at(10, 0));
        assert_eq!(end, at(11, 0));
    }

    #[test]
    fn participant_statuses() {
        let ok = serde_json::json!([
            { "name": "Ana", "status": "confirmed" },
            { "name": "Beto" },
        ]);
        assert!(validate_participants(&ok).is_ok());
        assert!(validate_participants(&serde_json::json!([])).is_ok());

        let bad = serde_json::json!([{ "name": "Ana", "status": "maybe" }]);
        assert!(validate_participants(&bad).is_err());
        assert!(validate_participants(&serde_json::json!({ "name": "Ana" })).is_err());
        assert!(validate_participants(&serde_json::json!(["Ana"])).is_err());
    }

    #[test]
    fn time_range_validation() {
        assert!(validate_time_range(at(1, 10), at(1, 10)).is_ok());
        assert!(validate_time_range(at(1, 10), at(1, 9)).is_err());
    }
}
