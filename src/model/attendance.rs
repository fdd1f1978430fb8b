use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A check-in/check-out pair recorded during the day ("asistenciasemana").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub id: String,
    pub account_number: String,
    pub name: String,
    pub block_type: String,
    pub recorded_at: DateTime<Utc>,
    pub rounded_check_in: Option<String>,
    pub rounded_check_out: Option<String>,
    /// Precomputed by the check-out flow when available.
    pub worked_hours: Option<f64>,
}

/// An attendance event after reconciliation, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedAttendanceEvent {
    #[serde(flatten)]
    pub event: AttendanceEvent,
    pub original_id: String,
    pub processed_at: DateTime<Utc>,
}

impl ArchivedAttendanceEvent {
    pub fn from_event(event: AttendanceEvent, processed_at: DateTime<Utc>) -> Self {
        let original_id = event.id.clone();
        Self {
            event,
            original_id,
            processed_at,
        }
    }
}
