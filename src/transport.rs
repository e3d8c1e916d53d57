use crate::errors::LeadError;
use reqwest::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Connect timeout for every request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for a response head once connected. The request counts
/// as delivered when this runs out.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a single request.
///
/// `delivered` is true once the request was handed to the server. It says
/// nothing about whether RD Station accepted the lead; check `status` for that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
    /// HTTP status, when a response head came back.
    pub status: Option<u16>,
    /// Response body, only read when response capture is enabled.
    pub body: Option<String>,
}

impl Delivery {
    pub fn undelivered() -> Self {
        Self::default()
    }

    /// True for a 2xx response.
    pub fn accepted(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

impl From<Delivery> for bool {
    fn from(delivery: Delivery) -> Self {
        delivery.delivered
    }
}

/// Parses the request URL, dropping `https` to plain HTTP when `plaintext` is set.
///
/// An explicit port is kept; otherwise the plain URL targets port 80.
pub fn target_url(raw: &str, plaintext: bool) -> Result<Url, LeadError> {
    let mut url = Url::parse(raw)?;

    if url.host_str().is_none() {
        return Err(LeadError::Transport("URL has no host".to_string()));
    }

    if plaintext && url.scheme() == "https" {
        url.set_scheme("http")
            .map_err(|_| LeadError::Transport("Cannot downgrade URL scheme to http".to_string()))?;
    }

    Ok(url)
}

/// Serializes the payload with `token_rdstation` set to the public token (null when absent).
pub fn encode_payload(
    mut payload: Map<String, Value>,
    public_token: Option<&str>,
) -> Result<Vec<u8>, LeadError> {
    payload.insert(
        "token_rdstation".to_string(),
        public_token.map_or(Value::Null, Value::from),
    );
    Ok(serde_json::to_vec(&payload)?)
}

/// HTTP transport. Every request opens its own connection and redirects
/// are never followed.
#[derive(Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new() -> Result<Self, LeadError> {
        Self::with_timeouts(CONNECT_TIMEOUT, RESPONSE_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, response: Duration) -> Result<Self, LeadError> {
        // reqwest starts the read timer with the request, so it must outlast the connect
        let client = Client::builder()
            .connect_timeout(connect)
            .read_timeout(connect + response)
            .redirect(Policy::none())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| LeadError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Sends one JSON request.
    ///
    /// `log_url` is the URL as it may appear in logs and errors.
    pub async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Vec<u8>,
        capture_response: bool,
        log_url: &str,
    ) -> Result<Delivery, LeadError> {
        let length = body.len();
        tracing::debug!("{} {} ({} bytes)", method, log_url, length);

        let result = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, length)
            .header(CONNECTION, "Close")
            .body(body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                let message = describe(e);
                tracing::error!("Could not connect to {}: {}", log_url, message);
                return Err(LeadError::Connection {
                    url: log_url.to_string(),
                    message,
                });
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!("{} {} sent, no response in time", method, log_url);
                return Ok(Delivery {
                    delivered: true,
                    status: None,
                    body: None,
                });
            }
            Err(e) => {
                tracing::warn!("{} {} was not delivered: {}", method, log_url, describe(e));
                return Ok(Delivery::undelivered());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} {} answered {}", method, log_url, status);
        }

        let body = if capture_response {
            match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!("Failed to read response from {}: {}", log_url, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Delivery {
            delivered: true,
            status: Some(status.as_u16()),
            body,
        })
    }
}

/// Error message with its causes, without the request URL (it may hold the private token).
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
