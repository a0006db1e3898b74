//! Shared HTTP execution for provider calls.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderFailure;

/// Send a request and decode a JSON success body.
///
/// Non-2xx responses become [`ProviderFailure::Http`] carrying the provider's
/// message and `Retry-After` hint; transport errors map through
/// `From<reqwest::Error>`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderFailure> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderFailure::from_response(
            status.as_u16(),
            &headers,
            &body,
        ));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ProviderFailure::Decode(format!("failed to parse response body: {e}")))
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
