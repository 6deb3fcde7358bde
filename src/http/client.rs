use std::time::Duration;

use reqwest::Client;
use tracing::error;

use crate::error::AppResult;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("curlpress/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client. Descriptors that set `User-Agent`
/// override the default.
///
/// # Errors
///
/// Returns an error when the client cannot be constructed.
pub fn build_client(request_timeout: Option<Duration>) -> AppResult<Client> {
    let mut client_builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
    if let Some(timeout) = request_timeout {
        client_builder = client_builder.timeout(timeout);
    }
    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        err.into()
    })
}
