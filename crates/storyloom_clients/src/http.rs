//! Shared request plumbing and error mapping for both clients.

use crate::ClientConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storyloom_error::{DecodeError, NetworkError, NetworkErrorKind, StoryloomResult};
use tracing::debug;

/// Build the shared reqwest client from a configuration.
pub(crate) fn build_client(config: &ClientConfig) -> StoryloomResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(*config.timeout_secs()))
        .build()
        .map_err(|e| NetworkError::new(NetworkErrorKind::Transport(e.to_string())).into())
}

/// POST a JSON body and decode a JSON response, mapping failures into the
/// Storyloom taxonomy: connect errors are the not-connected case (offline
/// branch), timeouts and other transport failures are network errors,
/// non-2xx is a status error, and a malformed body is a decode error.
pub(crate) async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    config: &ClientConfig,
    path: &str,
    body: &Req,
) -> StoryloomResult<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let url = format!("{}{}", config.base_url(), path);
    debug!(url = %url, "Sending Storyloom API request");

    let response = client
        .post(&url)
        .bearer_auth(config.api_key())
        .json(body)
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(NetworkError::new(NetworkErrorKind::Status {
            status: status.as_u16(),
            message,
        })
        .into());
    }

    response
        .json::<Resp>()
        .await
        .map_err(|e| DecodeError::new(format!("Failed to parse response: {}", e)).into())
}

fn map_transport_error(e: reqwest::Error) -> storyloom_error::StoryloomError {
    if e.is_connect() {
        NetworkError::new(NetworkErrorKind::NotConnected).into()
    } else if e.is_timeout() {
        NetworkError::new(NetworkErrorKind::Timeout(e.to_string())).into()
    } else {
        NetworkError::new(NetworkErrorKind::Transport(e.to_string())).into()
    }
}
