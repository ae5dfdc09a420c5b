use std::time::Duration;

use log::warn;

use crate::error::{PipelineError, PipelineResult};

const THROTTLE_BACKOFF: Duration = Duration::from_secs(10);

/// Fetches a URL, retrying forever on HTTP 429 with a fixed backoff. `400`
/// and `404` are treated as a permanent rejection of this particular
/// resource rather than a transient fault; anything else in the 4xx/5xx
/// range, or a transport-level failure, is reported as upstream
/// unavailability.
pub async fn get(client: &reqwest::Client, url: &str) -> PipelineResult<Vec<u8>> {
    loop {
        let response = client.get(url).send().await.map_err(|why| {
            PipelineError::UpstreamUnavailable {
                url: url.to_string(),
                reason: why.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|why| PipelineError::UpstreamUnavailable {
                    url: url.to_string(),
                    reason: why.to_string(),
                });
        }

        match status.as_u16() {
            400 | 404 => {
                return Err(PipelineError::UpstreamRejected {
                    url: url.to_string(),
                    status: status.as_u16(),
                })
            }
            429 => {
                warn!("throttled fetching {url}, retrying in {THROTTLE_BACKOFF:?}");
                tokio::time::sleep(THROTTLE_BACKOFF).await;
                continue;
            }
            other => {
                return Err(PipelineError::UpstreamUnavailable {
                    url: url.to_string(),
                    reason: format!("unexpected status {other}"),
                })
            }
        }
    }
}
