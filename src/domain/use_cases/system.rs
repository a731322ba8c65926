use std::{
    future::Future,
    time::{Duration, Instant},
};

use chrono::Utc;
use humantime::format_duration;
use parking_lot::RwLock;
use serde::Serialize;
use sysinfo::System;

use crate::constants::{API_VERSION, START_TIME};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DependencyStatus {
    #[serde(rename = "OK")]
    Up,
    #[serde(rename = "Unavailable")]
    Down,
    #[serde(rename = "Not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub os: String,
    pub kernel: String,
    pub hostname: String,
    pub cpu_count: usize,
    pub memory_total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime: String,
    pub timestamp: String,
    pub started_at: String,
    pub database: DependencyStatus,
    pub redis: DependencyStatus,
    pub version: &'static str,
    pub memory_usage: String,
    pub system: HostInfo,
}

impl HealthReport {
    /// Healthy as long as the database answers; Redis is optional.
    pub fn capture(database: DependencyStatus, redis: DependencyStatus) -> Self {
        let now = Utc::now();
        let uptime = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

        let mut sys = System::new_all();
        sys.refresh_all();

        let memory_usage = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .map_or_else(|| UNKNOWN.to_string(), |p| format!("{:.2} MB", p.memory() as f64 / BYTES_PER_MB));

        HealthReport {
            status: if database == DependencyStatus::Up { "healthy" } else { "degraded" },
            uptime: format_duration(Duration::from_secs(uptime)).to_string(),
            timestamp: now.to_rfc3339(),
            started_at: START_TIME.to_rfc3339(),
            database,
            redis,
            version: API_VERSION,
            memory_usage,
            system: HostInfo {
                os: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
                kernel: System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
                hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
                cpu_count: sys.cpus().len(),
                memory_total: format!("{:.2} GB", sys.total_memory() as f64 / BYTES_PER_MB / 1024.0),
            },
        }
    }
}

/// Keeps the last health report for `ttl` so frequent polling does not hit
/// the database on every request.
pub struct HealthMonitor {
    ttl: Duration,
    last: RwLock<Option<(Instant, HealthReport)>>,
}

impl HealthMonitor {
    pub fn new(ttl: Duration) -> Self {
        HealthMonitor {
            ttl,
            last: RwLock::new(None),
        }
    }

    fn fresh(&self) -> Option<HealthReport> {
        self.last
            .read()
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, report)| report.clone())
    }

    /// The dependency checks only run when the cached report has expired.
    pub async fn report<D, R>(&self, database: D, redis: R) -> HealthReport
    where
        D: Future<Output = DependencyStatus>,
        R: Future<Output = DependencyStatus>,
    {
        if let Some(report) = self.fresh() {
            return report;
        }

        let (database, redis) = futures::join!(database, redis);
        let report = HealthReport::capture(database, redis);
        if database != DependencyStatus::Up {
            tracing::warn!("Health check: database unavailable");
        }
        *self.last.write() = Some((Instant::now(), report.clone()));
        report
    }
}
