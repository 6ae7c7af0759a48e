use super::{ApiError, Backend, Endpoint, Method};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Default address of the reconciliation backend
pub const DEFAULT_API_URL: &str = "http://localhost:9000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// [`Backend`] over HTTP using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid api url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "api url cannot be a base: {}",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Full request URL. Segments are percent-encoded, so external
    /// references containing `/` or spaces stay a single segment.
    pub fn url(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("api");
            for segment in endpoint.segments() {
                segments.push(segment);
            }
        }
        if let Some((key, value)) = endpoint.query() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        url
    }
}

impl Backend for HttpBackend {
    async fn call(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let request = match endpoint.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .map(super::envelope::error_message)
                .unwrap_or_else(|| status.to_string());
            log::warn!("{} returned {}: {}", endpoint, status, message);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        body.ok_or_else(|| ApiError::Payload {
            endpoint: endpoint.to_string(),
            message: "response body is not JSON".to_string(),
        })
    }
}
