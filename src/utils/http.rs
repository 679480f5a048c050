use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: StatusCode },

    #[error("failed to fetch {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Source of raw page markup. The extractors only ever ask for one page per
/// operation step and never retry on their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub fn create_client(config: &Config) -> Result<Client, FetchError> {
    ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .pool_max_idle_per_host(6)
        .build()
        .map_err(FetchError::Client)
}

/// reqwest-backed fetcher with exponential backoff between attempts.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: create_client(config)?,
            max_retries: config.max_retries.max(1),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_with_retry(&self.client, url, self.max_retries).await
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<String, FetchError> {
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    response.text().await.map_err(request_error)
}

pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
) -> Result<String, FetchError> {
    let mut attempts = 0;

    loop {
        debug!("GET {} (attempt {}/{})", url, attempts + 1, max_retries);
        let err = match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(err) => err,
        };

        match &err {
            FetchError::Status { status, .. } => warn!("HTTP error {}: {}", status, url),
            _ => error!("Request failed for {}: {}", url, err),
        }

        attempts += 1;
        if attempts >= max_retries {
            return Err(FetchError::Exhausted {
                url: url.to_string(),
                attempts,
                last: Box::new(err),
            });
        }

        let delay = Duration::from_secs(2u64.pow(attempts));
        warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
        sleep(delay).await;
    }
}
