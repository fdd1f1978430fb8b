use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use chrono_tz::Tz;
use dotenvy::dotenv;

use crate::reconcile::calendar::DayBoundary;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub run_migrations: bool,

    // Rate limiting
    pub rate_trigger_per_min: u32,

    pub reconcile: ReconcileSettings,
}

/// Knobs for the daily job and its trigger.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    /// Zone whose calendar defines "today".
    pub time_zone: Tz,
    /// Local clock time the trigger fires at.
    pub run_at: NaiveTime,
    pub day_boundary: DayBoundary,
    pub lookup_concurrency: usize,
    pub isolate_shift_errors: bool,
    pub timeout: Option<Duration>,
    pub scheduler_enabled: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::Mexico_City,
            run_at: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            day_boundary: DayBoundary::Utc,
            lookup_concurrency: 1,
            isolate_shift_errors: false,
            timeout: None,
            scheduler_enabled: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", false)?,
            rate_trigger_per_min: parse_or(&lookup, "RATE_TRIGGER_PER_MIN", 10)?,
            reconcile: ReconcileSettings::from_lookup(&lookup)?,
        })
    }
}

impl ReconcileSettings {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let time_zone = match lookup("RECONCILE_TZ") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow!("RECONCILE_TZ is not a known time zone: {e}"))?,
            None => defaults.time_zone,
        };

        let run_at = match lookup("RECONCILE_AT") {
            Some(value) => NaiveTime::parse_from_str(&value, "%H:%M")
                .with_context(|| format!("RECONCILE_AT must be HH:MM, got {value:?}"))?,
            None => defaults.run_at,
        };

        let timeout_secs: u64 = parse_or(lookup, "RECONCILE_TIMEOUT_SECS", 0)?;

        Ok(Self {
            time_zone,
            run_at,
            day_boundary: parse_or(lookup, "RECONCILE_DAY_BOUNDARY", defaults.day_boundary)?,
            lookup_concurrency: parse_or(lookup, "RECONCILE_LOOKUP_CONCURRENCY", 1usize)?.max(1),
            isolate_shift_errors: parse_or(lookup, "RECONCILE_ISOLATE_SHIFT_ERRORS", false)?,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            scheduler_enabled: parse_or(lookup, "RECONCILE_SCHEDULER_ENABLED", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value {raw:?}: {e}")),
        None => Ok(default),
    }
}
