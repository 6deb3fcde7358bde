use std::sync::Arc;

use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

use crate::args::PositiveU64;
use crate::curl::DescriptorBuilder;
use crate::metrics::Stats;

use super::execution::{drain_response_body, read_response_text};

/// What happened to one iteration's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The descriptor could not be turned into a request; nothing was sent.
    Skipped,
    Success(StatusCode),
    Failure,
}

/// Builds and sends one request per call, recording the outcome.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    builder: Arc<dyn DescriptorBuilder>,
    show_every: Option<PositiveU64>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        client: Client,
        builder: Arc<dyn DescriptorBuilder>,
        show_every: Option<PositiveU64>,
    ) -> Self {
        Self {
            client,
            builder,
            show_every,
        }
    }

    /// Whether sequence number `seq` falls on the sampling interval.
    #[must_use]
    pub fn is_sampled(&self, seq: u64) -> bool {
        self.show_every
            .is_some_and(|every| seq.checked_rem(every.get()) == Some(0))
    }

    /// Sends the expanded `descriptor`. `case` is the data row position
    /// reported with sampled responses.
    pub async fn dispatch(
        &self,
        seq: u64,
        case: u64,
        descriptor: &str,
        stats: &Stats,
    ) -> DispatchOutcome {
        let request = match self.builder.build(&self.client, descriptor) {
            Ok(request) => request,
            Err(err) => {
                stats.record_build_failure();
                error!("err:{}", err);
                return DispatchOutcome::Skipped;
            }
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                stats.record_failure();
                error!("err:{}", err);
                return DispatchOutcome::Failure;
            }
        };
        stats.record_success();
        let status = response.status();

        if self.is_sampled(seq) {
            match read_response_text(response).await {
                Ok(body) => info!(
                    "case={},code={},req={},rsp={}",
                    case, status, descriptor, body
                ),
                Err(err) => warn!("case={},code={},failed to read body: {}", case, status, err),
            }
        } else if let Err(err) = drain_response_body(response).await {
            warn!("Failed to drain response body: {}", err);
        }

        DispatchOutcome::Success(status)
    }
}
