use std::time::Duration;

use crate::config::CatalogSettings;

use super::error::FetchError;
use super::model::{CatalogQuery, Track};

/// Blocking HTTP client for the catalog backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_http(http, &settings.base_url))
    }

    pub fn with_http(http: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `query`.
    pub fn url_for(&self, query: &CatalogQuery) -> String {
        format!("{}{}", self.base_url, query.path())
    }

    /// Fetch one catalog snapshot.
    pub fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Track>, FetchError> {
        let url = self.url_for(query);
        tracing::debug!(%url, "fetching catalog");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text()?;
        parse_tracks(&body)
    }
}

/// Decode a catalog response body.
pub fn parse_tracks(body: &str) -> Result<Vec<Track>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Playable URL for `track`: the base address joined with `track.src`.
pub fn audio_url(base_url: &str, track: &Track) -> String {
    join_url(base_url, &track.src)
}

/// Join `base` and `path` with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
