use serde::{Deserialize, Serialize};

/// One staff member's expected window ("horario") for some weekdays of a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub account_number: String,
    pub name: String,
    pub block_type: String,
    /// Lowercase Spanish weekday names, e.g. `["lunes", "miércoles"]`.
    pub weekdays: Vec<String>,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
}
