use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2026-10-19",
    "block_type": "A",
    "total_shifts": 12,
    "present_count": 10,
    "absent_count": 2,
    "late_count": 3,
    "early_leave_count": 1,
    "skipped_count": 0
}))]
pub struct ReconciliationSummary {
    #[schema(example = "2026-10-19", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub block_type: String,
    pub total_shifts: usize,
    pub present_count: usize,
    pub absent_count: usize,
    pub late_count: usize,
    pub early_leave_count: usize,
    /// Shifts dropped because of bad data when error isolation is enabled.
    pub skipped_count: usize,
}
