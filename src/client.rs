//! HTTP client for the game server's balance and clubhouse endpoints.

extern crate alloc;

use alloc::string::{String, ToString};
use core::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::error::{ActionError, BetError};
use crate::result::{Outcome, RoundResult};

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Non-success status with an empty body.
    #[error("failed: {0}")]
    Failed(StatusCode),
    /// Non-success status; `body` is the server's message.
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        /// Response status.
        status: StatusCode,
        /// Error message from the payload, or the raw body.
        body: String,
    },
    /// The response did not carry a readable balance.
    #[error("unexpected response")]
    UnexpectedResponse,
    /// Bad base URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Base URL is not http or https.
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
    /// The bet was rejected before dealing.
    #[error("invalid bet: {0}")]
    Bet(#[from] BetError),
    /// The action is not allowed in the current round state.
    #[error("invalid action: {0}")]
    Action(#[from] ActionError),
    /// The settlement task panicked or was aborted.
    #[error("settlement task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for client operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Where the game server lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the game server.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Base URL used when none is configured.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5001";
    /// Request timeout used when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a config for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::InvalidScheme(other.to_string())),
        }
        // Endpoints are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Reads `CLUBHOUSE_BASE_URL` and `CLUBHOUSE_TIMEOUT_MS`, falling back to
    /// the defaults for anything unset or unparsable.
    ///
    /// # Errors
    ///
    /// Returns an error if `CLUBHOUSE_BASE_URL` is set to an invalid URL.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("CLUBHOUSE_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("CLUBHOUSE_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Self::DEFAULT_TIMEOUT, Duration::from_millis);

        Ok(Self::new(base_url.trim())?.with_timeout(timeout))
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body of a clubhouse settlement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Always `"blackjack"`.
    pub game: &'static str,
    /// The bet amount.
    pub bet: u64,
    /// How the round ended.
    pub result: Outcome,
    /// The player's final hand value.
    pub player_value: u8,
    /// The dealer's final hand value.
    pub dealer_value: u8,
}

impl From<&RoundResult> for Settlement {
    fn from(result: &RoundResult) -> Self {
        Self {
            game: "blackjack",
            bet: result.bet,
            result: result.outcome,
            player_value: result.player_value,
            dealer_value: result.dealer_value,
        }
    }
}

/// The server sends cash as a decimal string, but plain numbers are
/// accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Cash {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cash {
    fn whole_units(&self) -> Option<i64> {
        let truncate = |value: f64| value.is_finite().then(|| value.trunc() as i64);
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => truncate(*value),
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(truncate))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CashResponse {
    cash: Option<Cash>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(alias = "virhe")]
    error: String,
}

/// Client for the game server.
#[derive(Debug, Clone)]
pub struct ClubhouseClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ClubhouseClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Returns the server's base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the current authoritative balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the response has no readable `cash`.
    pub async fn balance(&self) -> Result<i64> {
        let url = self.base_url.join("api/game")?;
        let response = self.http.get(url).send().await?;
        read_cash(response).await
    }

    /// Reports a finished round and returns the balance after settlement.
    ///
    /// `idempotency_key` is sent as the `Idempotency-Key` header so a server
    /// that records it can ignore a repeated submission of the same round.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the response has no readable `cash`.
    pub async fn settle(&self, result: &RoundResult, idempotency_key: &str) -> Result<i64> {
        let url = self.base_url.join("api/clubhouse")?;
        let response = self
            .http
            .post(url)
            .header("Idempotency-Key", idempotency_key)
            .json(&Settlement::from(result))
            .send()
            .await?;
        read_cash(response).await
    }
}

async fn read_cash(response: reqwest::Response) -> Result<i64> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if body.trim().is_empty() {
            return Err(Error::Failed(status));
        }
        let body = serde_json::from_str::<ErrorPayload>(&body)
            .map_or(body, |payload| payload.error);
        return Err(Error::FailedWithBody { status, body });
    }

    let payload: CashResponse = response
        .json()
        .await
        .map_err(|_| Error::UnexpectedResponse)?;
    payload
        .cash
        .as_ref()
        .and_then(Cash::whole_units)
        .ok_or(Error::UnexpectedResponse)
}
