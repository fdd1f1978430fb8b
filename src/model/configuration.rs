use serde::{Deserialize, Serialize};

/// Singleton settings document shared with the rest of SICA.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Roster variant currently in force (e.g. a semester schedule).
    pub active_block_type: Option<String>,
}
