//! Persistence seam for the reconciler. The job only ever talks to the
//! lab's records through `AttendanceStore`, so a MySQL deployment and the
//! in-memory fake used by tests are interchangeable.

#[cfg(test)]
pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::attendance::{ArchivedAttendanceEvent, AttendanceEvent};
use crate::model::configuration::Configuration;
use crate::model::report::Report;
use crate::model::shift::Shift;
use crate::reconcile::calendar::DayBounds;

#[cfg(test)]
pub use memory::InMemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// The singleton configuration document, `None` if it does not exist.
    async fn fetch_configuration(&self) -> Result<Option<Configuration>, StoreError>;

    /// Every shift of `block_type` whose weekdays contain `weekday`.
    async fn shifts_for(&self, block_type: &str, weekday: &str)
    -> Result<Vec<Shift>, StoreError>;

    /// At most one open attendance event for the account and block recorded
    /// within `bounds`.
    async fn find_attendance(
        &self,
        account_number: &str,
        block_type: &str,
        bounds: DayBounds,
    ) -> Result<Option<AttendanceEvent>, StoreError>;

    /// Writes all reports atomically; ids are assigned by the store.
    async fn insert_reports(&self, reports: &[Report]) -> Result<(), StoreError>;

    /// Writes archive copies atomically.
    async fn archive_events(&self, archived: &[ArchivedAttendanceEvent])
    -> Result<(), StoreError>;

    /// Removes open attendance events atomically.
    async fn delete_events(&self, ids: &[String]) -> Result<(), StoreError>;
}
