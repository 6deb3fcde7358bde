use futures_util::StreamExt;

/// Reads and discards the body so the connection can be reused.
pub(super) async fn drain_response_body(
    response: reqwest::Response,
) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

pub(super) async fn read_response_text(
    response: reqwest::Response,
) -> Result<String, reqwest::Error> {
    let bytes = response.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
