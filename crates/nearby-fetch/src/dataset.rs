//! One-shot fetch of the essentials feature collection.

use nearby_core::{decode_feature_collection, AppConfig, Dataset};
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::http::{build_client, get_bytes, parse_url};
use crate::retry::retry_with_backoff;

/// Client for the published GeoJSON dataset.
pub struct DatasetClient {
    client: Client,
    url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DatasetClient {
    /// Creates a client for the dataset at `url`.
    ///
    /// `max_retries = 0` keeps the fetch strictly one-shot.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `url` does not parse, or
    /// [`FetchError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            url: parse_url(url)?,
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`DatasetClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.dataset_url,
            config.http_timeout_secs,
            &config.user_agent,
            config.fetch_max_retries,
            config.fetch_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and decode the dataset.
    ///
    /// Malformed features inside an otherwise valid collection are skipped,
    /// not reported as errors.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure.
    /// - [`FetchError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FetchError::Dataset`] when the body is not a feature collection.
    pub async fn fetch_dataset(&self) -> Result<Dataset, FetchError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_bytes(&self.client, &self.url)
        })
        .await?;

        let dataset = decode_feature_collection(&body)?;
        tracing::info!(
            url = %self.url,
            features = dataset.len(),
            skipped = dataset.skipped,
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Fetch the dataset, falling back to an empty one on any failure.
    pub async fn load_dataset(&self) -> Dataset {
        match self.fetch_dataset().await {
            Ok(dataset) => dataset,
            Err(err) => {
                tracing::warn!(
                    url = %self.url,
                    error = %err,
                    "dataset unavailable; continuing with an empty dataset"
                );
                Dataset::empty()
            }
        }
    }
}
