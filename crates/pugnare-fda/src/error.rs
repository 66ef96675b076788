use thiserror::Error;

/// Failures of an FDA label lookup batch. Every variant aborts the batch.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid FDA label API base URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("FDA label lookup canceled")]
    Cancelled,

    #[error("FDA API request for {brand} failed (url: {url}): {source}")]
    Http {
        brand: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("FDA API returned status other than 200 ({status}) url: {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode FDA API response for {brand} (url: {url}): {source}")]
    Decode {
        brand: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no FDA label results found for brand name: {brand} url: {url}")]
    NoResults { brand: String, url: String },

    #[error("no brand-matching FDA label found for brand name: {brand} url: {url}")]
    UnmatchedBrand { brand: String, url: String },

    #[error("malformed effective_time {value:?} on FDA label for {brand} (expected YYYYMMDD)")]
    EffectiveTime { brand: String, value: String },
}
