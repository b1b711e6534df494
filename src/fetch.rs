//! Polite HTTP fetching
//!
//! Single point of outbound network access for the whole pipeline. Every
//! request is preceded by a uniform random delay drawn from the configured
//! politeness interval - this spacing, not concurrency control, is what
//! keeps target hosts from classifying the traffic as abuse. The fetcher
//! never retries; a failed fetch means "signal absent" and the caller
//! moves on to its next candidate.

use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::{HttpConfig, PolitenessConfig};

/// Transport-level failure kinds. All of these are non-fatal to callers.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },
}

/// A successfully fetched response body with its content type
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Fetched {
    /// Body decoded as UTF-8, lossily. Registry pages and most company
    /// sites are UTF-8; anything else degrades to replacement chars.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.to_lowercase().contains("pdf")
    }
}

/// Rate-limited HTTP client shared across one batch run
#[derive(Debug, Clone)]
pub struct PoliteFetcher {
    client: reqwest::Client,
    delay: PolitenessConfig,
    http: HttpConfig,
}

impl PoliteFetcher {
    pub fn new(http: &HttpConfig, delay: &PolitenessConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            delay: delay.clone(),
            http: http.clone(),
        })
    }

    /// Sleep for a random interval inside the politeness window.
    /// Invoked before every outbound request, including doomed ones.
    async fn polite_delay(&self) {
        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.delay.min_delay_secs..=self.delay.max_delay_secs)
        };
        trace!("politeness delay: {:.2}s", secs);
        sleep(Duration::from_secs_f64(secs)).await;
    }

    fn classify(url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// HEAD existence probe. Success means the host answered with a status
    /// in [200, 400) after redirects; anything else is a failed probe.
    pub async fn probe(&self, url: &str) -> Result<StatusCode, FetchError> {
        self.polite_delay().await;
        debug!("HEAD {}", url);

        let response = self
            .client
            .head(url)
            .timeout(self.http.probe_timeout())
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if status.as_u16() >= 200 && status.as_u16() < 400 {
            Ok(status)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status,
            })
        }
    }

    /// GET a page body with the standard content timeout.
    pub async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        self.get_with_timeout(url, self.http.content_timeout()).await
    }

    /// GET a filing document, which may be a large PDF.
    pub async fn get_document(&self, url: &str) -> Result<Fetched, FetchError> {
        self.get_with_timeout(url, self.http.document_timeout()).await
    }

    async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<Fetched, FetchError> {
        self.polite_delay().await;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::classify(url, e))?
            .to_vec();

        Ok(Fetched {
            status,
            content_type,
            bytes,
        })
    }
}
