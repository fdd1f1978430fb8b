use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::AttendanceStore;
use crate::error::StoreError;
use crate::model::attendance::{ArchivedAttendanceEvent, AttendanceEvent};
use crate::model::configuration::Configuration;
use crate::model::report::Report;
use crate::model::shift::Shift;
use crate::reconcile::calendar::DayBounds;

/// Store operation that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    FetchConfiguration,
    ShiftsFor,
    FindAttendance,
    InsertReports,
    ArchiveEvents,
    DeleteEvents,
}

#[derive(Default)]
struct State {
    configuration: Option<Configuration>,
    shifts: Vec<Shift>,
    events: Vec<AttendanceEvent>,
    reports: Vec<Report>,
    archive: Vec<ArchivedAttendanceEvent>,
    fail_point: Option<FailPoint>,
}

/// Process-local store with the same semantics as the MySQL one.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_type(block_type: &str) -> Self {
        let store = Self::new();
        store.set_configuration(Some(Configuration {
            active_block_type: Some(block_type.to_string()),
        }));
        store
    }

    pub fn set_configuration(&self, configuration: Option<Configuration>) {
        if let Ok(mut state) = self.state.write() {
            state.configuration = configuration;
        }
    }

    pub fn add_shift(&self, shift: Shift) {
        if let Ok(mut state) = self.state.write() {
            state.shifts.push(shift);
        }
    }

    pub fn add_event(&self, event: AttendanceEvent) {
        if let Ok(mut state) = self.state.write() {
            state.events.push(event);
        }
    }

    pub fn fail_on(&self, point: Option<FailPoint>) {
        if let Ok(mut state) = self.state.write() {
            state.fail_point = point;
        }
    }

    pub fn reports(&self) -> Vec<Report> {
        self.state
            .read()
            .map(|s| s.reports.clone())
            .unwrap_or_default()
    }

    pub fn archived(&self) -> Vec<ArchivedAttendanceEvent> {
        self.state
            .read()
            .map(|s| s.archive.clone())
            .unwrap_or_default()
    }

    pub fn open_events(&self) -> Vec<AttendanceEvent> {
        self.state
            .read()
            .map(|s| s.events.clone())
            .unwrap_or_default()
    }

    fn read(&self, op: FailPoint) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Other("in-memory store poisoned".into()))?;
        check(&state, op)?;
        Ok(state)
    }

    fn write(&self, op: FailPoint) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        let state = self
            .state
            .write()
            .map_err(|_| StoreError::Other("in-memory store poisoned".into()))?;
        check(&state, op)?;
        Ok(state)
    }
}

fn check(state: &State, op: FailPoint) -> Result<(), StoreError> {
    if state.fail_point == Some(op) {
        return Err(StoreError::Other(format!("injected failure in {op:?}")));
    }
    Ok(())
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn fetch_configuration(&self) -> Result<Option<Configuration>, StoreError> {
        Ok(self.read(FailPoint::FetchConfiguration)?.configuration.clone())
    }

    async fn shifts_for(
        &self,
        block_type: &str,
        weekday: &str,
    ) -> Result<Vec<Shift>, StoreError> {
        let state = self.read(FailPoint::ShiftsFor)?;
        Ok(state
            .shifts
            .iter()
            .filter(|s| s.block_type == block_type && s.weekdays.iter().any(|d| d == weekday))
            .cloned()
            .collect())
    }

    async fn find_attendance(
        &self,
        account_number: &str,
        block_type: &str,
        bounds: DayBounds,
    ) -> Result<Option<AttendanceEvent>, StoreError> {
        let state = self.read(FailPoint::FindAttendance)?;
        Ok(state
            .events
            .iter()
            .find(|e| {
                e.account_number == account_number
                    && e.block_type == block_type
                    && e.recorded_at >= bounds.start
                    && e.recorded_at < bounds.end
            })
            .cloned())
    }

    async fn insert_reports(&self, reports: &[Report]) -> Result<(), StoreError> {
        let mut state = self.write(FailPoint::InsertReports)?;
        state.reports.extend(reports.iter().cloned().map(|mut r| {
            r.id = Some(Uuid::new_v4().to_string());
            r
        }));
        Ok(())
    }

    async fn archive_events(
        &self,
        archived: &[ArchivedAttendanceEvent],
    ) -> Result<(), StoreError> {
        let mut state = self.write(FailPoint::ArchiveEvents)?;
        state.archive.extend_from_slice(archived);
        Ok(())
    }

    async fn delete_events(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut state = self.write(FailPoint::DeleteEvents)?;
        state.events.retain(|e| !ids.contains(&e.id));
        Ok(())
    }
}
