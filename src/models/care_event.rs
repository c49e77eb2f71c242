use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CareEventStatus, CareEventType};

/// Maximum care event description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// A timestamped entry in a resident's care history. Embedded in the resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareEvent {
    pub id: Uuid,
    pub event_type: CareEventType,
    pub description: String,
    pub date: NaiveDate,
    pub doctor: Option<String>,
    pub medications: Option<String>,
    pub next_visit: Option<NaiveDate>,
    pub status: Option<CareEventStatus>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

/// Request body for appending a care event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCareEvent {
    pub event_type: CareEventType,
    pub description: String,
    pub date: NaiveDate,
    pub doctor: Option<String>,
    pub medications: Option<String>,
    pub next_visit: Option<NaiveDate>,
    pub status: Option<CareEventStatus>,
    pub remarks: Option<String>,
    pub created_by: Option<String>,
}

impl NewCareEvent {
    /// Check the description length (1–1000 characters after trimming).
    pub fn validate(&self) -> Result<(), String> {
        let len = self.description.trim().chars().count();
        if len == 0 {
            return Err("Care event description is required".into());
        }
        if len > MAX_DESCRIPTION_CHARS {
            return Err(format!(
                "Care event description exceeds {MAX_DESCRIPTION_CHARS} characters ({len})"
            ));
        }
        Ok(())
    }

    pub fn into_event(self, now: DateTime<Utc>) -> CareEvent {
        CareEvent {
            id: Uuid::new_v4(),
            event_type: self.event_type,
            description: self.description.trim().to_string(),
            date: self.date,
            doctor: self.doctor,
            medications: self.medications,
            next_visit: self.next_visit,
            status: self.status,
            remarks: self.remarks,
            created_at: now,
            created_by: self.created_by,
        }
    }
}

/// Care events most recent first (by date, then creation time).
pub fn timeline_order(events: &[CareEvent]) -> Vec<CareEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event(description: &str) -> NewCareEvent {
        NewCareEvent {
            event_type: CareEventType::Visit,
            description: description.into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            doctor: None,
            medications: None,
            next_visit: None,
            status: None,
            remarks: None,
            created_by: None,
        }
    }

    #[test]
    fn description_required() {
        assert!(new_event("   ").validate().is_err());
    }

    #[test]
    fn description_length_limit() {
        assert!(new_event(&"a".repeat(1000)).validate().is_ok());
        assert!(new_event(&"a".repeat(1001)).validate().is_err());
    }

    #[test]
    fn timeline_is_most_recent_first() {
        let now = Utc::now();
        let mut older = new_event("older").into_event(now);
        older.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let newer = new_event("newer").into_event(now);

        let sorted = timeline_order(&[older.clone(), newer.clone()]);
        assert_eq!(sorted[0].description, "newer");
        assert_eq!(sorted[1].description, "older");
    }
}
