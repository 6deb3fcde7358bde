use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running,
    Draining,
    Stopped,
}

impl EnginePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Running => "running",
            EnginePhase::Draining => "draining",
            EnginePhase::Stopped => "stopped",
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            EnginePhase::Idle => 0,
            EnginePhase::Running => 1,
            EnginePhase::Draining => 2,
            EnginePhase::Stopped => 3,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => EnginePhase::Idle,
            1 => EnginePhase::Running,
            2 => EnginePhase::Draining,
            _ => EnginePhase::Stopped,
        }
    }
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub(super) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub(super) const fn new(phase: EnginePhase) -> Self {
        Self(AtomicU8::new(phase.to_u8()))
    }

    pub(super) fn get(&self) -> EnginePhase {
        EnginePhase::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(super) fn set(&self, phase: EnginePhase) {
        self.0.store(phase.to_u8(), Ordering::Release);
    }

    /// Moves `from` to `to`; returns `false` if the phase was not `from`.
    pub(super) fn advance(&self, from: EnginePhase, to: EnginePhase) -> bool {
        self.0
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
