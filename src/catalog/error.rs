use thiserror::Error;

/// Failure while reading from the catalog backend.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure (connect, timeout, body read).
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("catalog returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not a JSON array of tracks.
    #[error("malformed catalog payload: {0}")]
    Payload(#[from] serde_json::Error),
}
