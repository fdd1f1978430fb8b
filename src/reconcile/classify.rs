//! Punctuality rules and the human-readable text stored on reports.

use chrono::NaiveTime;

pub const ON_TIME: &str = "Puntual";
pub const MISSING_CHECK_OUT: &str = "Sin registro de salida";

const LATE_MARKER: &str = "minutos tarde";
const EARLY_LEAVE_MARKER: &str = "minutos antes";

/// Parses `HH:MM` (or `HH:MM:SS`) clock values.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Signed minutes from `from` to `to`.
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (to - from).num_minutes()
}

pub fn late_remark(minutes: i64) -> Option<String> {
    (minutes > 0).then(|| format!("Llegó {minutes} {LATE_MARKER}"))
}

pub fn early_leave_remark(minutes: i64) -> Option<String> {
    (minutes > 0).then(|| format!("Salió {minutes} {EARLY_LEAVE_MARKER}"))
}

pub fn absence_remark(start: &str, end: &str) -> String {
    format!("Faltó a su horario de {start} a {end}")
}

/// Joins remarks, or reports the shift as on time when there are none.
pub fn observations(remarks: Vec<String>) -> String {
    if remarks.is_empty() {
        ON_TIME.to_string()
    } else {
        remarks.join(", ")
    }
}

// Summary counts are derived from report text rather than from numeric
// flags, so reports written by older runs are counted the same way.
pub fn has_late_remark(observations: &str) -> bool {
    observations.contains(LATE_MARKER)
}

pub fn has_early_leave_remark(observations: &str) -> bool {
    observations.contains(EARLY_LEAVE_MARKER)
}

/// Hours with at most two decimals and no trailing zeros: `4`, `3.5`, `-4`.
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn hours_between(from: NaiveTime, to: NaiveTime) -> f64 {
    minutes_between(from, to) as f64 / 60.0
}
