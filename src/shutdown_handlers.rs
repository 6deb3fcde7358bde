use std::time::Duration;

use tokio::sync::broadcast;
use tracing::info;

use crate::shutdown::{ShutdownReceiver, ShutdownSender};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Forwards SIGINT/SIGTERM (Ctrl+C elsewhere) into the shutdown channel.
///
/// On unix both signals are registered before this returns, so a signal
/// delivered while the task is still unscheduled is not lost.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    #[cfg(unix)]
    {
        let mut interrupt = register_signal(SignalKind::interrupt(), "SIGINT");
        let mut terminate = register_signal(SignalKind::terminate(), "SIGTERM");
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                () = next_signal(interrupt.as_mut()) => {
                    info!("Interrupt received, draining workers.");
                    drop(shutdown_tx.send(()));
                }
                () = next_signal(terminate.as_mut()) => {
                    info!("Terminate received, draining workers.");
                    drop(shutdown_tx.send(()));
                }
            }
        })
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, draining workers.");
                    drop(shutdown_tx.send(()));
                }
            }
        })
    }
}

#[cfg(unix)]
fn register_signal(kind: SignalKind, name: &str) -> Option<tokio::signal::unix::Signal> {
    match signal(kind) {
        Ok(signal) => Some(signal),
        Err(err) => {
            eprintln!("Failed to register {} handler: {}", name, err);
            None
        }
    }
}

/// Resolves on the next delivery; never resolves when registration failed.
#[cfg(unix)]
async fn next_signal(signal: Option<&mut tokio::signal::unix::Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Sends shutdown once `duration` has elapsed, unless shutdown came first.
pub fn setup_deadline_shutdown_handler(
    shutdown_tx: &ShutdownSender,
    duration: Duration,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            () = tokio::time::sleep(duration) => {
                info!("Run duration of {:?} reached, draining workers.", duration);
                drop(shutdown_tx.send(()));
            }
        }
    })
}
