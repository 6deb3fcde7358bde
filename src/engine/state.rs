use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::data::DataTable;
use crate::http::{Dispatcher, Pacer};
use crate::metrics::Stats;

use super::phase::{EnginePhase, PhaseCell};

/// Process-wide request counter. Every call to [`Sequence::next`] yields a
/// distinct value, starting at 1.
#[derive(Debug, Default)]
pub struct Sequence(AtomicU64);

impl Sequence {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Last value handed out, 0 before the first call.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// State shared by every worker of one run.
pub(super) struct EngineState {
    pub(super) table: DataTable,
    pub(super) descriptor: String,
    pub(super) sequence: Sequence,
    pub(super) stats: Stats,
    pub(super) pacer: Pacer,
    pub(super) dispatcher: Dispatcher,
    live: AtomicBool,
    pub(super) phase: PhaseCell,
}

impl EngineState {
    pub(super) fn new(
        table: DataTable,
        descriptor: String,
        pacer: Pacer,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            table,
            descriptor,
            sequence: Sequence::new(),
            stats: Stats::new(),
            pacer,
            dispatcher,
            live: AtomicBool::new(true),
            phase: PhaseCell::new(EnginePhase::Running),
        }
    }

    pub(super) fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Clears the live flag. Returns `true` only for the call that cleared it.
    pub(super) fn clear_live(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}
