//! HTTP client for the openFDA drug label search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::LookupError;
use crate::cancel::CancelToken;
use crate::label::{LabelDocument, LabelSearchResponse};
use crate::limiter::RateLimiter;

pub const FDA_LABEL_API: &str = "https://api.fda.gov/drug/label.json";
pub const DEFAULT_USER_AGENT: &str = "pugnare.health/1.0";

/// Settings for [`FdaLabelClient`].
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Label search endpoint, without query string.
    pub api_base: String,
    /// `limit` sent with every search.
    pub page_size: u32,
    /// Minimum spacing between requests.
    pub interval: Duration,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: FDA_LABEL_API.to_string(),
            page_size: 30,
            interval: Duration::from_secs(2),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Raw documents returned for one brand query.
#[derive(Debug, Clone)]
pub struct LabelSearch {
    /// Exact request URL, kept for diagnostics.
    pub url: String,
    pub documents: Vec<LabelDocument>,
}

/// Something that can answer a brand-name label search.
#[async_trait]
pub trait LabelSource: Send + Sync {
    /// Run one search for `brand`. Implementations that pace their requests
    /// must abort with [`LookupError::Cancelled`] when `cancel` fires while
    /// waiting.
    async fn search(&self, brand: &str, cancel: &CancelToken) -> Result<LabelSearch, LookupError>;

    /// Minimum spacing between searches, used for progress estimates.
    fn interval(&self) -> Duration {
        Duration::ZERO
    }
}

/// Rate-limited openFDA label search client.
///
/// One instance owns one limiter, so every search made through it during a
/// batch shares the same pacing.
pub struct FdaLabelClient {
    http: Client,
    base: Url,
    page_size: u32,
    limiter: RateLimiter,
}

impl FdaLabelClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let base = Url::parse(&config.api_base).map_err(|source| LookupError::BaseUrl {
            url: config.api_base.clone(),
            source,
        })?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(LookupError::Client)?;

        Ok(Self {
            http,
            base,
            page_size: config.page_size,
            limiter: RateLimiter::new(config.interval),
        })
    }

    /// `<base>?search=<brand>&limit=<page_size>`
    pub fn query_url(&self, brand: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("search", brand)
            .append_pair("limit", &self.page_size.to_string());
        url
    }
}

#[async_trait]
impl LabelSource for FdaLabelClient {
    async fn search(&self, brand: &str, cancel: &CancelToken) -> Result<LabelSearch, LookupError> {
        self.limiter.acquire(cancel).await?;

        let url = self.query_url(brand).to_string();
        debug!(brand, url = %url, "querying FDA label search");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Http {
                brand: brand.to_string(),
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await.map_err(|source| LookupError::Http {
            brand: brand.to_string(),
            url: url.clone(),
            source,
        })?;
        let envelope: LabelSearchResponse =
            serde_json::from_str(&body).map_err(|source| LookupError::Decode {
                brand: brand.to_string(),
                url: url.clone(),
                source,
            })?;

        if envelope.results.is_empty() {
            return Err(LookupError::NoResults {
                brand: brand.to_string(),
                url,
            });
        }

        info!(
            brand,
            status = status.as_u16(),
            documents = envelope.results.len(),
            "FDA label search done"
        );
        Ok(LabelSearch {
            url,
            documents: envelope.results,
        })
    }

    fn interval(&self) -> Duration {
        self.limiter.interval()
    }
}
