//! Daily time trigger for the reconciler.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::reconcile::Reconciler;

/// First instant strictly after `now` whose local clock in `tz` reads `run_at`.
pub fn next_run_after(now: DateTime<Utc>, run_at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let today = now.with_timezone(&tz).date_naive();

    (0..=2)
        .map(|offset| today + Duration::days(offset))
        .filter_map(|day| tz.from_local_datetime(&day.and_time(run_at)).earliest())
        .map(|local| local.with_timezone(&Utc))
        .find(|candidate| *candidate > now)
        .unwrap_or_else(|| now + Duration::days(1))
}

/// Spawns the background loop on the current actix runtime.
pub fn spawn_daily(reconciler: Reconciler) {
    actix_web::rt::spawn(async move {
        run_forever(reconciler).await;
    });
}

async fn run_forever(reconciler: Reconciler) {
    let settings = reconciler.settings().clone();
    info!(
        time_zone = %settings.time_zone,
        run_at = %settings.run_at,
        "Daily reconciliation scheduled"
    );

    loop {
        let now = Utc::now();
        let next = next_run_after(now, settings.run_at, settings.time_zone);
        let wait = (next - now).to_std().unwrap_or(StdDuration::ZERO);
        info!(next_run = %next, "Waiting for next reconciliation");

        actix_web::rt::time::sleep(wait).await;

        match reconciler.run_daily_reconciliation().await {
            Ok(summary) => info!(
                date = %summary.date,
                total = summary.total_shifts,
                absent = summary.absent_count,
                "Scheduled reconciliation succeeded"
            ),
            // No retry here: a failed day stays failed until someone re-runs it.
            Err(e) => error!(error = %e, "Scheduled reconciliation failed"),
        }
    }
}
