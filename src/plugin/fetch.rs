//! Fire-and-forget spray downloads.
//!
//! A fetch runs as its own tokio task and reports back through an unbounded
//! channel. The controller drains that channel on its tick, so the cache is
//! only ever written from the game loop.

use reqwest::{header, StatusCode};
use tokio::sync::mpsc;

use super::{config::PluginConfig, host::UserId};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("backend answered {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed frame list: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub user_id: UserId,
    pub result: Result<Vec<String>, FetchError>,
}

pub type FetchSender = mpsc::UnboundedSender<FetchOutcome>;
pub type FetchReceiver = mpsc::UnboundedReceiver<FetchOutcome>;

pub fn fetch_channel() -> (FetchSender, FetchReceiver) {
    mpsc::unbounded_channel()
}

/// Starts a download; the result arrives later as a [`FetchOutcome`].
pub trait Fetcher {
    fn fetch(&self, user_id: &UserId);
}

/// Body of a successful lookup: a JSON array is an animation, anything else is
/// a single frame of text.
///
/// The content type decides. Without one, a body that parses as a string
/// array is taken as frames.
pub fn parse_spray_body(content_type: Option<&str>, body: &str) -> Result<Vec<String>, FetchError> {
    match content_type {
        Some(ct) if ct.starts_with("application/json") => Ok(serde_json::from_str(body)?),
        None if body.trim_start().starts_with('[') => {
            Ok(serde_json::from_str(body).unwrap_or_else(|_| vec![body.to_string()]))
        }
        _ => Ok(vec![body.to_string()]),
    }
}

pub async fn fetch_spray(
    client: &reqwest::Client,
    backend_url: &str,
    api_token: &str,
    user_id: &UserId,
) -> Result<Vec<String>, FetchError> {
    let url = format!("{}/spray", backend_url.trim_end_matches('/'));
    let response = client
        .get(url)
        .query(&[("userid", user_id.as_str())])
        .header(header::AUTHORIZATION, api_token)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;
    parse_spray_body(content_type.as_deref(), &body)
}

pub struct HttpFetcher {
    client: reqwest::Client,
    backend_url: String,
    api_token: String,
    sender: FetchSender,
    runtime: tokio::runtime::Handle,
}

impl HttpFetcher {
    pub fn new(config: &PluginConfig, sender: FetchSender, runtime: tokio::runtime::Handle) -> Self {
        Self::with_client(reqwest::Client::new(), config, sender, runtime)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &PluginConfig,
        sender: FetchSender,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        HttpFetcher {
            client,
            backend_url: config.backend_url.clone(),
            api_token: config.api_token.clone(),
            sender,
            runtime,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, user_id: &UserId) {
        let client = self.client.clone();
        let backend_url = self.backend_url.clone();
        let api_token = self.api_token.clone();
        let sender = self.sender.clone();
        let user_id = user_id.clone();
        self.runtime.spawn(async move {
            let result = fetch_spray(&client, &backend_url, &api_token, &user_id).await;
            // The controller may already be gone
            let _ = sender.send(FetchOutcome { user_id, result });
        });
    }
}
