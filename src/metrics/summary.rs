use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use super::StatsSnapshot;

/// Divisor for values stored in hundredths.
const PERCENT_DIVISOR: u64 = 100;
/// Milliseconds per second.
const MS_PER_SEC: u128 = 1_000;

/// Final report of a run, computed once every worker has stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub build_failures: u64,
    pub duration: Duration,
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    #[must_use]
    pub const fn new(snapshot: StatsSnapshot, duration: Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            total_requests: snapshot.total_requests,
            success_count: snapshot.success_count,
            failure_count: snapshot.failure_count,
            build_failures: snapshot.build_failures,
            duration,
            started_at,
        }
    }

    /// Success rate in hundredths of a percent; 0 when nothing was sent.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        let scaled = u128::from(self.success_count)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.total_requests))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }

    /// Throughput in hundredths of a request per second; 0 when nothing was
    /// sent or no measurable time elapsed.
    #[must_use]
    pub fn requests_per_sec_x100(&self) -> u64 {
        let duration_ms = self.duration.as_millis();
        if self.total_requests == 0 || duration_ms == 0 {
            return 0;
        }
        let scaled = u128::from(self.total_requests)
            .saturating_mul(MS_PER_SEC.saturating_mul(u128::from(PERCENT_DIVISOR)))
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let success_rate = self.success_rate_x100();
        let rps = self.requests_per_sec_x100();
        let mut lines = vec![
            "=== Pressure Test Summary ===".to_owned(),
            format!(
                "Started At: {}",
                self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            format!("Total Requests: {}", self.total_requests),
            format!("Success: {}", self.success_count),
            format!("Failure: {}", self.failure_count),
            format!(
                "Success Rate: {}.{:02}%",
                success_rate / PERCENT_DIVISOR,
                success_rate % PERCENT_DIVISOR
            ),
            format!("Duration: {}", format_duration(self.duration)),
            format!(
                "Requests Per Second: {}.{:02}",
                rps / PERCENT_DIVISOR,
                rps % PERCENT_DIVISOR
            ),
        ];
        if self.build_failures > 0 {
            lines.push(format!("Unbuildable Requests: {}", self.build_failures));
        }
        lines
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
}
