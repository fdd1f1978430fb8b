//! Daily attendance reconciliation.
//!
//! Once per day the expected shifts of the active block are compared with the
//! check-ins recorded for that day. Every shift yields exactly one report
//! (present or absent); matched check-ins are copied to the archive and then
//! removed from the open store. The three writes (reports, archive copies,
//! deletes) are separate commits, always issued in that order.

pub mod calendar;
pub mod classify;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::ReconcileSettings;
use crate::error::ReconcileError;
use crate::model::attendance::{ArchivedAttendanceEvent, AttendanceEvent};
use crate::model::report::{Report, ReportStatus};
use crate::model::shift::Shift;
use crate::model::summary::ReconciliationSummary;
use crate::store::AttendanceStore;

use self::calendar::{day_bounds, local_date, weekday_name};
use self::classify::{
    MISSING_CHECK_OUT, absence_remark, early_leave_remark, format_hours, has_early_leave_remark,
    has_late_remark, hours_between, late_remark, minutes_between, observations, parse_clock,
};

#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn AttendanceStore>,
    settings: ReconcileSettings,
}

impl Reconciler {
    pub fn new(store: Arc<dyn AttendanceStore>, settings: ReconcileSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Reconciles "today" according to the wall clock.
    pub async fn run_daily_reconciliation(&self) -> Result<ReconciliationSummary, ReconcileError> {
        self.run_at(Utc::now()).await
    }

    /// Reconciles the local calendar day containing `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ReconciliationSummary, ReconcileError> {
        match self.settings.timeout {
            Some(limit) => actix_web::rt::time::timeout(limit, self.reconcile(now))
                .await
                .map_err(|_| ReconcileError::TimedOut(limit))?,
            None => self.reconcile(now).await,
        }
    }

    async fn reconcile(&self, now: DateTime<Utc>) -> Result<ReconciliationSummary, ReconcileError> {
        let date = local_date(now, self.settings.time_zone);
        let weekday = weekday_name(date);
        let block_type = self.active_block_type().await?;

        let shifts = self.store.shifts_for(&block_type, weekday).await?;
        info!(%date, weekday, %block_type, shifts = shifts.len(), "Reconciliation started");

        let events = self.lookup_events(&shifts, date).await?;

        let mut reports = Vec::with_capacity(shifts.len());
        let mut matched = Vec::new();
        let mut skipped = 0usize;

        for (shift, event) in shifts.iter().zip(events) {
            let outcome = build_report(shift, event.as_ref(), date, now);
            match outcome {
                Ok(report) => {
                    debug!(
                        report = %report.natural_key(),
                        status = %report.status,
                        observations = %report.observations,
                        "Shift reconciled"
                    );
                    reports.push(report);
                    matched.extend(event);
                }
                Err(e) if self.settings.isolate_shift_errors => {
                    warn!(error = %e, shift = %shift.id, "Skipping shift with bad data");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if !reports.is_empty() {
            self.store.insert_reports(&reports).await?;
        }
        self.archive(matched, now).await?;

        let summary = summarize(date, block_type, shifts.len(), &reports, skipped);
        info!(
            date = %summary.date,
            present = summary.present_count,
            absent = summary.absent_count,
            late = summary.late_count,
            early_leave = summary.early_leave_count,
            skipped = summary.skipped_count,
            "Reconciliation finished"
        );
        Ok(summary)
    }

    async fn active_block_type(&self) -> Result<String, ReconcileError> {
        let configuration = self
            .store
            .fetch_configuration()
            .await?
            .ok_or(ReconcileError::ConfigurationMissing)?;

        configuration
            .active_block_type
            .filter(|b| !b.trim().is_empty())
            .ok_or(ReconcileError::BlockTypeMissing)
    }

    /// One lookup per shift, in roster order.
    async fn lookup_events(
        &self,
        shifts: &[Shift],
        date: NaiveDate,
    ) -> Result<Vec<Option<AttendanceEvent>>, ReconcileError> {
        let bounds = day_bounds(date, self.settings.day_boundary, self.settings.time_zone);

        let events: Vec<Option<AttendanceEvent>> = stream::iter(shifts.iter().map(|shift| {
            self.store
                .find_attendance(&shift.account_number, &shift.block_type, bounds)
        }))
        .buffered(self.settings.lookup_concurrency.max(1))
        .try_collect()
        .await?;

        Ok(events)
    }

    async fn archive(
        &self,
        matched: Vec<AttendanceEvent>,
        now: DateTime<Utc>,
    ) -> Result<(), ReconcileError> {
        // Two shifts of the same person can match the same check-in.
        let mut seen = HashSet::new();
        let matched: Vec<AttendanceEvent> = matched
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();

        if matched.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = matched.iter().map(|e| e.id.clone()).collect();
        let archived: Vec<ArchivedAttendanceEvent> = matched
            .into_iter()
            .map(|e| ArchivedAttendanceEvent::from_event(e, now))
            .collect();

        self.store.archive_events(&archived).await?;
        self.store.delete_events(&ids).await?;
        Ok(())
    }
}

fn clock(shift: &Shift, value: &str) -> Result<NaiveTime, ReconcileError> {
    parse_clock(value).ok_or_else(|| ReconcileError::MalformedTime {
        shift: shift.id.clone(),
        value: value.to_string(),
    })
}

fn optional_clock(shift: &Shift, value: Option<&str>) -> Result<Option<NaiveTime>, ReconcileError> {
    value.map(|v| clock(shift, v)).transpose()
}

/// Builds the report for one shift given its matched event, if any.
pub fn build_report(
    shift: &Shift,
    event: Option<&AttendanceEvent>,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Report, ReconcileError> {
    let start = clock(shift, &shift.start_time)?;
    let end = clock(shift, &shift.end_time)?;

    let report = Report {
        id: None,
        name: shift.name.clone(),
        account_number: shift.account_number.clone(),
        date,
        check_in: None,
        check_out: None,
        worked_time: String::new(),
        observations: String::new(),
        block_type: shift.block_type.clone(),
        status: ReportStatus::Absent,
        created_at: now,
    };

    let Some(event) = event else {
        return Ok(Report {
            worked_time: format_hours(-hours_between(start, end)),
            observations: absence_remark(shift.start_time.trim(), shift.end_time.trim()),
            ..report
        });
    };

    let check_in = optional_clock(shift, event.rounded_check_in.as_deref())?;
    let check_out = optional_clock(shift, event.rounded_check_out.as_deref())?;

    let mut remarks = Vec::new();
    if let Some(check_in) = check_in {
        remarks.extend(late_remark(minutes_between(start, check_in)));
    }
    match check_out {
        Some(check_out) => remarks.extend(early_leave_remark(minutes_between(check_out, end))),
        None => remarks.push(MISSING_CHECK_OUT.to_string()),
    }

    let worked_time = match (event.worked_hours, check_in, check_out) {
        (Some(hours), _, _) => format_hours(hours),
        (None, Some(check_in), Some(check_out)) => format_hours(hours_between(check_in, check_out)),
        _ => format_hours(0.0),
    };

    Ok(Report {
        check_in: event.rounded_check_in.clone(),
        check_out: event.rounded_check_out.clone(),
        worked_time,
        observations: observations(remarks),
        status: ReportStatus::Present,
        ..report
    })
}

fn summarize(
    date: NaiveDate,
    block_type: String,
    total_shifts: usize,
    reports: &[Report],
    skipped_count: usize,
) -> ReconciliationSummary {
    let present_count = reports
        .iter()
        .filter(|r| r.status == ReportStatus::Present)
        .count();

    ReconciliationSummary {
        date,
        block_type,
        total_shifts,
        present_count,
        absent_count: reports.len() - present_count,
        late_count: reports
            .iter()
            .filter(|r| has_late_remark(&r.observations))
            .count(),
        early_leave_count: reports
            .iter()
            .filter(|r| has_early_leave_remark(&r.observations))
            .count(),
        skipped_count,
    }
}
