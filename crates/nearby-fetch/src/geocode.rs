//! Reverse geocoding of the user's coordinate to a locality name.
//!
//! Display-only: the search engine never consumes the result.

use nearby_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::FetchError;
use crate::http::{build_client, get_bytes, parse_url};
use crate::retry::retry_with_backoff;

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    locality: Option<String>,
}

/// Client for a `reverse-geocode-client` style endpoint.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    language: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeocodeClient {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` does not parse, or
    /// [`FetchError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        language: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_url(base_url)?,
            language: language.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`GeocodeClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.geocode_url,
            &config.locality_language,
            config.http_timeout_secs,
            &config.user_agent,
            config.fetch_max_retries,
            config.fetch_backoff_base_ms,
        )
    }

    pub(crate) fn lookup_url(&self, at: Coordinate) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &at.lat.to_string())
            .append_pair("longitude", &at.lon.to_string())
            .append_pair("localityLanguage", &self.language);
        url
    }

    /// Locality name for `at`, or `None` when the service has no name for it.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure.
    /// - [`FetchError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FetchError::Deserialize`] if the body is not the expected JSON object.
    pub async fn locality(&self, at: Coordinate) -> Result<Option<String>, FetchError> {
        let url = self.lookup_url(at);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_bytes(&self.client, &url)
        })
        .await?;

        let parsed: ReverseGeocodeResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Deserialize {
                context: format!("reverse geocode ({at})"),
                source: e,
            })?;

        Ok(parsed
            .locality
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty()))
    }
}
