use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::curl::DescriptorBuilder;
use crate::data::DataTable;
use crate::error::AppResult;
use crate::http::{Dispatcher, Pacer, build_client};
use crate::metrics::{RunSummary, StatsSnapshot};
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::shutdown_handlers::shutdown_channel;

use super::config::EngineConfig;
use super::phase::EnginePhase;
use super::state::EngineState;
use super::worker::run_worker;

/// A configured run that has not started yet.
pub struct Engine {
    config: EngineConfig,
    builder: Arc<dyn DescriptorBuilder>,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig, builder: Arc<dyn DescriptorBuilder>) -> Self {
        Self { config, builder }
    }

    #[must_use]
    pub const fn phase(&self) -> EnginePhase {
        EnginePhase::Idle
    }

    /// Loads the data table and spawns the workers. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when the data file cannot be read or the HTTP client
    /// cannot be built. No worker is spawned in that case.
    pub fn start(self) -> AppResult<RunningEngine> {
        let EngineConfig {
            data_path,
            separator,
            descriptor,
            rate,
            workers,
            show_every,
            request_timeout,
        } = self.config;

        let table = DataTable::load(data_path.as_deref(), &separator)?;
        let client = build_client(request_timeout)?;
        let dispatcher = Dispatcher::new(client, self.builder, show_every);
        let pacer = Pacer::per_second(rate);
        let state = Arc::new(EngineState::new(table, descriptor, pacer, dispatcher));

        let (shutdown_tx, _shutdown_rx) = shutdown_channel();
        let worker_count = workers.get();
        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let shutdown_rx = shutdown_tx.subscribe();
            workers.spawn(run_worker(id, Arc::clone(&state), shutdown_rx));
        }
        info!(
            "pressure test started: rate={}/s, workers={}, rows={}",
            rate.get(),
            worker_count,
            state.table.len()
        );

        Ok(RunningEngine {
            state,
            shutdown_tx,
            workers,
        })
    }
}

/// A run whose workers are live until [`RunningEngine::stop`].
pub struct RunningEngine {
    state: Arc<EngineState>,
    shutdown_tx: ShutdownSender,
    workers: JoinSet<()>,
}

impl RunningEngine {
    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.state.phase.get()
    }

    /// Live counters; individual fields may be mid-update.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.state.stats.snapshot()
    }

    /// Read-only handle that outlives [`RunningEngine::wait`].
    #[must_use]
    pub fn monitor(&self) -> EngineMonitor {
        EngineMonitor {
            state: Arc::clone(&self.state),
        }
    }

    /// Clears the live flag and interrupts pending rate-limit waits.
    /// In-flight requests finish on their own. Returns `false` if the run
    /// was already stopping.
    pub fn stop(&self) -> bool {
        if !self.state.clear_live() {
            return false;
        }
        self.state
            .phase
            .advance(EnginePhase::Running, EnginePhase::Draining);
        drop(self.shutdown_tx.send(()));
        info!("stopping, waiting for in-flight requests");
        true
    }

    /// Joins every worker and builds the summary. Blocks until
    /// [`RunningEngine::stop`] is called unless a worker dies first; workers
    /// are joined in completion order, so the first death stops the rest.
    ///
    /// # Errors
    ///
    /// Returns the first worker join error (a panicked or aborted task).
    pub async fn wait(mut self) -> AppResult<RunSummary> {
        let mut first_error = None;
        self.join_all(&mut first_error).await;
        self.finish(first_error)
    }

    /// Runs until `trigger` fires (or its sender is dropped), then drains.
    /// A worker that dies before the trigger ends the run early.
    ///
    /// # Errors
    ///
    /// Returns the first worker join error.
    pub async fn run_until(mut self, mut trigger: ShutdownReceiver) -> AppResult<RunSummary> {
        let mut first_error = None;
        loop {
            tokio::select! {
                _ = trigger.recv() => break,
                joined = self.workers.join_next() => match joined {
                    Some(result) => {
                        self.record_exit(result, &mut first_error);
                        if first_error.is_some() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        self.stop();
        self.join_all(&mut first_error).await;
        self.finish(first_error)
    }

    async fn join_all(&mut self, first_error: &mut Option<JoinError>) {
        while let Some(result) = self.workers.join_next().await {
            self.record_exit(result, first_error);
        }
    }

    fn record_exit(&self, result: Result<(), JoinError>, first_error: &mut Option<JoinError>) {
        let Err(err) = result else {
            return;
        };
        error!("worker task failed: {}", err);
        self.stop();
        if first_error.is_none() {
            *first_error = Some(err);
        }
    }

    fn finish(&self, first_error: Option<JoinError>) -> AppResult<RunSummary> {
        self.state.phase.set(EnginePhase::Stopped);
        if let Some(err) = first_error {
            return Err(err.into());
        }

        let stats = &self.state.stats;
        Ok(RunSummary::new(
            stats.snapshot(),
            stats.elapsed(),
            stats.started_at(),
        ))
    }
}

/// Observes a run without owning it.
#[derive(Clone)]
pub struct EngineMonitor {
    state: Arc<EngineState>,
}

impl EngineMonitor {
    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.state.phase.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.state.stats.snapshot()
    }

    /// Highest sequence number handed out so far.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        self.state.sequence.current()
    }
}
