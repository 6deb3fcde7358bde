//! Cancellation fan-out shared by the signal handlers and the engine.
use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;
