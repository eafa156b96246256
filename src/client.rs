//! HTTP client for the switcher's management API.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::model::{AutoSwitchAction, AutoSwitchBody, Envelope, StatusSnapshot, SwitchRequest};

/// Used when the backend reports a failure without saying why.
pub const GENERIC_FAILURE: &str = "unknown error";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    /// The backend answered `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("request was interrupted")]
    Interrupted,
}

impl ClientError {
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        ClientError::Rejected(message)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Wrapper around reqwest bound to one switcher instance.
#[derive(Clone)]
pub struct SwitcherClient {
    base_url: String,
    http: Client,
}

impl SwitcherClient {
    /// `base_url` is the web port of the switcher, e.g. `http://127.0.0.1:1081`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("switchpanel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http.request(method, url)
    }

    /// Decode the JSON envelope whatever the HTTP status; error replies carry
    /// their message in the body.
    async fn envelope<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<Envelope<T>> {
        let response = req.send().await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn command(&self, req: RequestBuilder) -> ClientResult<()> {
        let envelope: Envelope<Value> = self.envelope(req).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(ClientError::rejected(envelope.error))
        }
    }

    async fn text(&self, path: &str) -> ClientResult<String> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.text().await?)
    }

    /// `GET /api/status`. Only a successful reply with a payload counts.
    pub async fn status(&self) -> ClientResult<StatusSnapshot> {
        let envelope: Envelope<StatusSnapshot> =
            self.envelope(self.request(Method::GET, "/api/status")).await?;
        match envelope {
            Envelope { success: true, data: Some(snapshot), .. } => Ok(snapshot),
            Envelope { error, .. } => Err(ClientError::rejected(error)),
        }
    }

    pub async fn switch(&self, request: &SwitchRequest) -> ClientResult<()> {
        self.command(self.request(Method::POST, "/api/switch").json(request))
            .await
    }

    pub async fn set_auto_switch(&self, action: AutoSwitchAction) -> ClientResult<()> {
        let body = AutoSwitchBody { action };
        self.command(self.request(Method::POST, "/api/auto-switch").json(&body))
            .await
    }

    /// Kick off an update check. The result only shows up in the logs.
    pub async fn trigger_update(&self) -> ClientResult<()> {
        self.command(
            self.request(Method::POST, "/api/update")
                .header(reqwest::header::CONTENT_TYPE, "application/json"),
        )
        .await
    }

    pub async fn logs(&self) -> ClientResult<String> {
        self.text("/api/logs").await
    }

    /// Re-download the subscription; the backend answers with a pool report.
    pub async fn refresh_subscription(&self) -> ClientResult<String> {
        self.text("/s").await
    }

    pub async fn ping_report(&self) -> ClientResult<String> {
        self.text("/p").await
    }
}
