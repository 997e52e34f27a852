//! Shared HTTP plumbing for provider calls
//!
//! Every provider request goes through [`get_json`], which turns transport
//! failures, non-2xx statuses and undecodable bodies into
//! [`WeatherBoardError::Upstream`].

use crate::{Result, WeatherBoardError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("weatherboard/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all providers
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WeatherBoardError::config(format!("Failed to create HTTP client: {e}")))
}

/// GET `url` with `query` and decode the JSON body into `T`.
///
/// Query values may contain keys; only `url` is logged.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T> {
    let start_time = Instant::now();
    debug!(provider, url, "Sending upstream request");

    let response = client.get(url).query(query).send().await.map_err(|e| {
        if e.is_timeout() {
            warn!(provider, "Upstream request timed out");
            WeatherBoardError::upstream(provider, "request timed out")
        } else {
            let e = e.without_url();
            warn!(provider, error = %e, "Upstream request failed");
            WeatherBoardError::upstream(provider, format!("request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!(provider, %status, "Upstream returned an error status");
        return Err(WeatherBoardError::upstream(
            provider,
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            ),
        ));
    }

    let body = response.bytes().await.map_err(|e| {
        WeatherBoardError::upstream(provider, format!("failed to read response body: {}", e.without_url()))
    })?;

    let value = serde_json::from_slice::<T>(&body).map_err(|e| {
        warn!(provider, error = %e, "Upstream response did not match the expected schema");
        WeatherBoardError::upstream(provider, format!("malformed response: {e}"))
    })?;

    debug!(
        provider,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Upstream request complete"
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: u32,
    }

    fn client() -> Client {
        build_client(Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_success_with_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .and(query_param("q", "51.5,-0.12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/data", server.uri());
        let payload: Payload = get_json(&client(), "test", &url, &[("q", "51.5,-0.12")])
            .await
            .unwrap();
        assert_eq!(payload.value, 7);
    }

    #[tokio::test]
    async fn test_get_json_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/data", server.uri());
        let err = get_json::<Payload>(&client(), "test", &url, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherBoardError::Upstream { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_get_json_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/data", server.uri());
        let err = get_json::<Payload>(&client(), "test", &url, &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_get_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"value": 1}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = build_client(Duration::from_millis(100)).unwrap();
        let url = format!("{}/data", server.uri());
        let err = get_json::<Payload>(&client, "test", &url, &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
