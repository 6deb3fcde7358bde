use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::args::PositiveU64;
use crate::shutdown::ShutdownReceiver;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Token bucket with a capacity of one token: hands out dispatch slots at
/// fixed intervals, shared by every worker so the rate is global.
///
/// Slots are reserved with a CAS on the next free slot, so no lock is held
/// while a caller sleeps. Idle time does not accumulate tokens.
#[derive(Debug)]
pub struct Pacer {
    origin: Instant,
    interval_nanos: u64,
    next_slot: AtomicU64,
}

impl Pacer {
    #[must_use]
    pub fn per_second(rate: PositiveU64) -> Self {
        let interval_nanos = NANOS_PER_SEC.checked_div(rate.get()).unwrap_or(1).max(1);
        Self {
            origin: Instant::now(),
            interval_nanos,
            next_slot: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }

    /// Reserves the next slot and returns how long the caller must wait
    /// for it.
    pub(crate) fn reserve(&self) -> Duration {
        let now = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let mut current = self.next_slot.load(Ordering::Relaxed);
        loop {
            let slot = current.max(now);
            let next = slot.saturating_add(self.interval_nanos);
            match self.next_slot.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Duration::from_nanos(slot.saturating_sub(now)),
                Err(observed) => current = observed,
            }
        }
    }

    /// Waits for a slot. Returns `false` when cancellation arrives first.
    pub async fn acquire(&self, shutdown_rx: &mut ShutdownReceiver) -> bool {
        let wait = self.reserve();
        if wait.is_zero() {
            return true;
        }
        tokio::select! {
            _ = shutdown_rx.recv() => false,
            () = sleep(wait) => true,
        }
    }
}
