use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    Present,
    Absent,
}

/// Daily outcome for one shift ("reportesasesores").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Assigned by the store on insert.
    pub id: Option<String>,
    pub name: String,
    pub account_number: String,
    pub date: NaiveDate,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    /// Hours worked; negative when the whole shift was missed.
    pub worked_time: String,
    pub observations: String,
    pub block_type: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// `date|account|block type`, unique per shift and day.
    pub fn natural_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.date.format("%Y-%m-%d"),
            self.account_number,
            self.block_type
        )
    }
}
