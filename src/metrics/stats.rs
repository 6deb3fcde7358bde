use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Lock-free run counters shared by every worker.
///
/// Each counter is updated on its own, so a snapshot taken while workers
/// are running may briefly show `total_requests` ahead of
/// `success_count + failure_count`.
#[derive(Debug)]
pub struct Stats {
    total_requests: AtomicU64,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    build_failures: AtomicU64,
    started: Instant,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Descriptors that never became a request; not part of `total_requests`.
    pub build_failures: u64,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            build_failures: AtomicU64::new(0),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn record_success(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_build_failure(&self) {
        self.build_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            build_failures: self.build_failures.load(Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}
