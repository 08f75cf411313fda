mod auth;
mod community;
mod competitions;
mod gateway;
mod rewards;
mod types;

#[cfg(test)]
mod test_server;

pub use types::RetryConfig;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use super::dto::ErrorBody;
use super::ApiError;
use crate::config::{AppConfig, TimeoutConfig};
use types::USER_AGENT;

/// REST client for the competitions and rewards backend
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) retry_config: RetryConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_settings(&config.api.base_url, &config.timeouts, config.retry.clone())
    }

    pub fn with_settings(
        base_url: &str,
        timeouts: &TimeoutConfig,
        retry_config: RetryConfig,
    ) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL '{}'", base_url))?;

        // Relative joins drop the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            retry_config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for the given path segments; each segment is
    /// percent-encoded on its own.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL '{}' cannot hold a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated GET, retried on transient failures
    pub(super) async fn get_json<T>(
        &self,
        operation_name: &str,
        url: Url,
        token: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute_with_retry(operation_name, || {
            let request = self.client.get(url.clone()).bearer_auth(token);
            async move { Self::send_once(request).await }
        })
        .await
    }

    /// POST sent exactly once; a replayed mutation could double-spend
    pub(super) async fn post_json<B, T>(
        &self,
        operation_name: &str,
        url: Url,
        token: Option<&str>,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        debug!("[http] {}", operation_name);
        Self::send_once(request)
            .await
            .with_context(|| format!("{} failed", operation_name))
    }

    async fn send_once<T>(request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });

            debug!("[http] {} -> {}: {}", url, status, message);
            return Err(ApiError::Status { status, message }.into());
        }

        // 204 and empty acknowledgements decode as an empty object
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };

        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            ApiError::Decode(format!("{} from {}: {}", e, url, preview)).into()
        })
    }

    /// Execute a request with retry logic
    ///
    /// Retries on:
    /// - Network errors (connection failures, timeouts)
    /// - 5xx server errors
    /// - 429 Too Many Requests
    ///
    /// Does NOT retry on other 4xx responses or decode failures.
    async fn execute_with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        mut request_fn: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut backoff = Duration::from_millis(self.retry_config.initial_backoff_ms);

        loop {
            attempt += 1;

            match request_fn().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("[http] {} succeeded after {} attempts", operation_name, attempt);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let should_retry =
                        attempt <= self.retry_config.max_retries && is_retryable_error(&e);

                    if !should_retry {
                        if attempt > 1 {
                            warn!("[http] {} failed after {} attempts", operation_name, attempt);
                        }
                        return Err(e.context(format!("{} failed", operation_name)));
                    }

                    warn!(
                        "[http] {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        operation_name,
                        attempt,
                        self.retry_config.max_retries + 1,
                        e,
                        backoff.as_millis()
                    );

                    sleep(backoff).await;
                    backoff = self.retry_config.next_backoff(backoff);
                }
            }
        }
    }
}

/// Transport failures, 5xx and 429 are worth another attempt
fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(api_err) = error.downcast_ref::<ApiError>() {
        return api_err.is_retryable();
    }

    if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
        return reqwest_err.is_connect() || reqwest_err.is_timeout() || reqwest_err.is_request();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_settings(base, &TimeoutConfig::default(), RetryConfig::disabled()).unwrap()
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let api = client("http://localhost:8080/api/v1");
        assert_eq!(api.base_url().as_str(), "http://localhost:8080/api/v1/");
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let api = client("http://localhost:8080/api/");

        let url = api.endpoint(&["competitions", "spring cup/2", "enter"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/competitions/spring%20cup%2F2/enter"
        );

        let root = client("http://localhost:8080");
        assert_eq!(
            root.endpoint(&["users", "me"]).unwrap().as_str(),
            "http://localhost:8080/users/me"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::with_settings(
            "not a url",
            &TimeoutConfig::default(),
            RetryConfig::default()
        )
        .is_err());
    }

    #[test]
    fn test_retryable_errors() {
        let status = |code: u16| -> anyhow::Error {
            ApiError::Status {
                status: StatusCode::from_u16(code).unwrap(),
                message: String::new(),
            }
            .into()
        };

        assert!(is_retryable_error(&status(503)));
        assert!(is_retryable_error(&status(429)));
        assert!(!is_retryable_error(&status(404)));
        assert!(!is_retryable_error(&ApiError::Decode("x".into()).into()));
        assert!(!is_retryable_error(&anyhow::anyhow!("other")));
    }

    #[tokio::test]
    async fn test_get_retries_server_errors() {
        let server = test_server::TestServer::start(vec![
            test_server::reply(503, r#"{"message":"busy"}"#),
            test_server::reply(200, r#"{"code":"ABC"}"#),
        ])
        .await;

        let retry = RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            backoff_multiplier: 2.0,
        };
        let api =
            ApiClient::with_settings(&server.base_url(), &TimeoutConfig::default(), retry).unwrap();

        let url = api.endpoint(&["referrals", "me"]).unwrap();
        let body: serde_json::Value = api.get_json("Get referrals", url, "tok").await.unwrap();

        assert_eq!(body["code"], "ABC");
        let requests = server.requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .to_ascii_lowercase()
            .contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn test_post_is_not_retried() {
        let server = test_server::TestServer::start(vec![
            test_server::reply(503, r#"{"error":"down"}"#),
            test_server::reply(200, "{}"),
        ])
        .await;

        let retry = RetryConfig {
            max_retries: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            backoff_multiplier: 2.0,
        };
        let api =
            ApiClient::with_settings(&server.base_url(), &TimeoutConfig::default(), retry).unwrap();

        let url = api.endpoint(&["rewards", "daily", "claim"]).unwrap();
        let result: Result<serde_json::Value> =
            api.post_json("Claim", url, Some("tok"), &serde_json::json!({})).await;

        let err = result.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api_err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(api_err.to_string().contains("down"));
        assert_eq!(server.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_object() {
        let server = test_server::TestServer::start(vec![test_server::reply(204, "")]).await;
        let api = client(&server.base_url());

        let url = api.endpoint(&["competitions", "c1", "enter"]).unwrap();
        let body: serde_json::Value = api.post_json("Enter", url, Some("t"), &()).await.unwrap();

        assert_eq!(body, serde_json::json!({}));
    }
}
