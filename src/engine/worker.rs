use std::sync::Arc;

use tracing::debug;

use crate::shutdown::ShutdownReceiver;
use crate::template;

use super::state::EngineState;

/// One worker: wait for a slot, pick the next row, expand, dispatch.
/// Exits once the live flag is cleared or cancellation interrupts a wait.
pub(super) async fn run_worker(id: usize, state: Arc<EngineState>, mut shutdown_rx: ShutdownReceiver) {
    while state.is_live() {
        if !state.pacer.acquire(&mut shutdown_rx).await {
            break;
        }
        if !state.is_live() {
            break;
        }

        let seq = state.sequence.next();
        let row = state.table.row_for(seq);
        let case = state.table.case_for(seq).unwrap_or(0);
        let descriptor = template::expand(&state.descriptor, row);
        state
            .dispatcher
            .dispatch(seq, case, &descriptor, &state.stats)
            .await;
    }
    debug!("worker {} exited", id);
}
