//! Catalog fetch errors

/// Any failure while fetching the catalog. The UI treats every variant the
/// same; the detail only goes to the log.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("detail task failed: {0}")]
    Task(String),
}
