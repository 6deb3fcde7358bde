use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use reqwest::{Client, Request};
use tempfile::tempdir;

use super::{Engine, EngineConfig, EnginePhase, Sequence};
use crate::args::{PositiveU64, PositiveUsize};
use crate::curl::{CurlBuilder, DescriptorBuilder};
use crate::error::{AppError, AppResult, DataError};
use crate::metrics::RunSummary;
use crate::shutdown_handlers::shutdown_channel;
use crate::test_support::spawn_http_server;

fn config(descriptor: &str, rate: u64, workers: usize) -> Result<EngineConfig, String> {
    let rate = PositiveU64::try_from(rate).map_err(|err| err.to_string())?;
    let workers = PositiveUsize::try_from(workers).map_err(|err| err.to_string())?;
    let mut config = EngineConfig::new(descriptor.to_owned(), rate, workers);
    config.request_timeout = Some(Duration::from_secs(5));
    Ok(config)
}

/// Panics on the `panic_on`-th build (0-based); every other build fails
/// cleanly so nothing is sent.
struct PanickingBuilder {
    calls: AtomicU64,
    panic_on: u64,
}

impl DescriptorBuilder for PanickingBuilder {
    fn build(&self, client: &Client, descriptor: &str) -> AppResult<Request> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if call == self.panic_on {
            panic!("builder failure on call {}", call);
        }
        CurlBuilder::new().build(client, descriptor)
    }
}

fn panicking_engine(panic_on: u64) -> Result<Engine, String> {
    let builder = PanickingBuilder {
        calls: AtomicU64::new(0),
        panic_on,
    };
    Ok(Engine::new(
        config("curl --frobnicate http://127.0.0.1:1/", 50, 4)?,
        Arc::new(builder),
    ))
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

async fn run_for(config: EngineConfig, period: Duration) -> Result<RunSummary, String> {
    let engine = Engine::new(config, Arc::new(CurlBuilder::new()));
    let running = engine.start().map_err(|err| err.to_string())?;
    tokio::time::sleep(period).await;
    running.stop();
    running.wait().await.map_err(|err| err.to_string())
}

#[test]
fn constant_rate_without_data() -> Result<(), String> {
    let server = spawn_http_server()?;
    let descriptor = format!("curl {}/ping", server.base_url);
    run_async_test(async {
        let summary = run_for(config(&descriptor, 5, 2)?, Duration::from_secs(2)).await?;
        if !(8..=12).contains(&summary.total_requests) {
            return Err(format!("Unexpected total: {}", summary.total_requests));
        }
        if summary.total_requests != summary.success_count.saturating_add(summary.failure_count) {
            return Err("Counters do not add up".to_owned());
        }
        if summary.success_count == 0 {
            return Err("Expected successful requests".to_owned());
        }
        Ok(())
    })?;

    let targets = server.request_targets()?;
    if targets.is_empty() || targets.iter().any(|target| target != "/ping") {
        return Err(format!("Unexpected targets: {:?}", targets));
    }
    Ok(())
}

#[test]
fn unreachable_host_counts_failures() -> Result<(), String> {
    run_async_test(async {
        let summary = run_for(
            config("curl http://127.0.0.1:1/", 20, 2)?,
            Duration::from_millis(500),
        )
        .await?;
        if summary.total_requests == 0 {
            return Err("Expected attempts".to_owned());
        }
        if summary.total_requests != summary.failure_count || summary.success_count != 0 {
            return Err(format!("Unexpected counters: {:?}", summary));
        }
        if !summary.lines().iter().any(|line| line == "Success Rate: 0.00%") {
            return Err(format!("Unexpected summary: {:?}", summary.lines()));
        }
        Ok(())
    })
}

#[test]
fn unbuildable_descriptor_is_not_counted() -> Result<(), String> {
    run_async_test(async {
        let summary = run_for(
            config("curl --frobnicate http://127.0.0.1:1/", 20, 1)?,
            Duration::from_millis(300),
        )
        .await?;
        if summary.total_requests != 0 {
            return Err(format!("Unexpected total: {}", summary.total_requests));
        }
        if summary.build_failures == 0 {
            return Err("Expected build failures".to_owned());
        }
        Ok(())
    })
}

#[test]
fn rows_drive_request_targets() -> Result<(), String> {
    let server = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("users.csv");
    std::fs::write(&path, "id\n1\n2\n3\n").map_err(|err| format!("write failed: {}", err))?;

    let mut config = config(
        &format!("curl {}/users/{{{{id}}}}?line={{{{_INDEX}}}}", server.base_url),
        50,
        3,
    )?;
    config.data_path = Some(path);

    run_async_test(async {
        let summary = run_for(config, Duration::from_millis(400)).await?;
        if summary.success_count == 0 {
            return Err("Expected successful requests".to_owned());
        }
        Ok(())
    })?;

    let allowed = ["/users/1?line=2", "/users/2?line=3", "/users/3?line=4"];
    let targets = server.request_targets()?;
    if let Some(target) = targets.iter().find(|target| !allowed.contains(&target.as_str())) {
        return Err(format!("Unexpected target: {}", target));
    }
    let distinct: HashSet<&String> = targets.iter().collect();
    if distinct.len() < 2 {
        return Err(format!("Expected round-robin rows, got {:?}", targets));
    }
    Ok(())
}

#[test]
fn phases_follow_lifecycle() -> Result<(), String> {
    run_async_test(async {
        let engine = Engine::new(
            config("curl http://127.0.0.1:1/", 10, 1)?,
            Arc::new(CurlBuilder::new()),
        );
        if engine.phase() != EnginePhase::Idle {
            return Err("Expected idle".to_owned());
        }
        let running = engine.start().map_err(|err| err.to_string())?;
        let monitor = running.monitor();
        if running.phase() != EnginePhase::Running {
            return Err(format!("Expected running, got {}", running.phase()));
        }
        if !running.stop() {
            return Err("First stop should report true".to_owned());
        }
        if running.stop() {
            return Err("Second stop should be a no-op".to_owned());
        }
        if running.phase() != EnginePhase::Draining {
            return Err(format!("Expected draining, got {}", running.phase()));
        }
        let summary = running.wait().await.map_err(|err| err.to_string())?;
        if monitor.phase() != EnginePhase::Stopped {
            return Err(format!("Expected stopped, got {}", monitor.phase()));
        }
        if monitor.snapshot().total_requests != summary.total_requests {
            return Err("Monitor and summary disagree".to_owned());
        }
        Ok(())
    })
}

#[test]
fn run_until_drains_on_trigger() -> Result<(), String> {
    run_async_test(async {
        let engine = Engine::new(
            config("curl http://127.0.0.1:1/", 10, 2)?,
            Arc::new(CurlBuilder::new()),
        );
        let running = engine.start().map_err(|err| err.to_string())?;
        let (trigger_tx, trigger_rx) = shutdown_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(trigger_tx.send(()));
        });
        let summary = tokio::time::timeout(Duration::from_secs(10), running.run_until(trigger_rx))
            .await
            .map_err(|err| format!("run_until did not finish: {}", err))?
            .map_err(|err| err.to_string())?;
        if summary.total_requests != summary.failure_count {
            return Err(format!("Unexpected counters: {:?}", summary));
        }
        Ok(())
    })
}

#[test]
fn missing_data_file_aborts_start() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let mut config = config("curl http://127.0.0.1:1/", 10, 1)?;
        config.data_path = Some(dir.path().join("missing.csv"));

        match Engine::new(config, Arc::new(CurlBuilder::new())).start() {
            Err(AppError::Data(DataError::Open { .. })) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Expected start to fail".to_owned()),
        }
    })
}

#[test]
fn sequence_values_are_unique_across_threads() -> Result<(), String> {
    let sequence = Arc::new(Sequence::new());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let sequence = Arc::clone(&sequence);
        handles.push(thread::spawn(move || {
            (0..1_000).map(|_| sequence.next()).collect::<Vec<u64>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let values = handle.join().map_err(|_err| "thread panicked".to_owned())?;
        for value in values {
            if !seen.insert(value) {
                return Err(format!("Duplicate sequence value {}", value));
            }
        }
    }
    if seen.len() != 8_000 || !seen.contains(&1) || !seen.contains(&8_000) {
        return Err(format!("Unexpected sequence range, {} values", seen.len()));
    }
    if sequence.current() != 8_000 {
        return Err(format!("Unexpected current: {}", sequence.current()));
    }
    Ok(())
}

#[test]
fn dead_worker_ends_wait_without_stop() -> Result<(), String> {
    run_async_test(async {
        for panic_on in [0, 2, 3] {
            let running = panicking_engine(panic_on)?
                .start()
                .map_err(|err| err.to_string())?;
            let monitor = running.monitor();
            let joined = tokio::time::timeout(Duration::from_secs(5), running.wait())
                .await
                .map_err(|_err| format!("wait hung after panic on call {}", panic_on))?;
            match joined {
                Err(AppError::Join { .. }) => {}
                Err(err) => return Err(format!("Unexpected error: {}", err)),
                Ok(_) => return Err(format!("Panic on call {} was not surfaced", panic_on)),
            }
            if monitor.phase() != EnginePhase::Stopped {
                return Err(format!("Expected stopped, got {}", monitor.phase()));
            }
        }
        Ok(())
    })
}

#[test]
fn dead_worker_ends_run_until_before_trigger() -> Result<(), String> {
    run_async_test(async {
        let running = panicking_engine(2)?
            .start()
            .map_err(|err| err.to_string())?;
        let (_trigger_tx, trigger_rx) = shutdown_channel();
        let joined = tokio::time::timeout(Duration::from_secs(5), running.run_until(trigger_rx))
            .await
            .map_err(|_err| "run_until hung after a worker panic".to_owned())?;
        match joined {
            Err(AppError::Join { .. }) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Worker panic was not surfaced".to_owned()),
        }
    })
}
