#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CENIPA occurrence loader.
//!
//! Fetches the raw CSV through an [`OccurrenceSource`], checks it against
//! the embedded [`dataset::DatasetDefinition`], and normalizes every row
//! into an [`OccurrenceTable`]. [`cache::OccurrenceCache`] memoizes the
//! result so the fetch happens at most once per cache.

pub mod cache;
pub mod csv_download;
pub mod dataset;
pub mod normalize;
pub mod parsing;
pub mod progress;

use async_trait::async_trait;
use cenipa_map_occurrence_models::{DuplicateIdError, OccurrenceTable};

use crate::dataset::DatasetDefinition;

/// Errors that can occur while loading the occurrence table.
///
/// All variants are fatal: nothing in the load path retries.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote source answered, but not with CSV content.
    #[error("Fetch error: {message}")]
    Fetch {
        /// Description of what went wrong.
        message: String,
    },

    /// Expected columns are absent from the CSV header.
    #[error("Schema error: missing columns {}", .missing.join(", "))]
    Schema {
        /// Source column names that were not found.
        missing: Vec<String>,
    },

    /// The normalized rows repeat an occurrence id.
    #[error("Integrity error: {0}")]
    DuplicateId(#[from] DuplicateIdError),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset definition could not be parsed.
    #[error("Dataset definition error: {0}")]
    Definition(#[from] toml::de::Error),
}

impl LoadError {
    /// Whether this error came from retrieving the CSV rather than from its
    /// contents.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Fetch { .. })
    }
}

/// Where raw CSV text comes from.
#[async_trait]
pub trait OccurrenceSource: Send + Sync {
    /// Human-readable label for log messages.
    fn label(&self) -> &str;

    /// Retrieves the full CSV text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the content cannot be retrieved.
    async fn fetch_csv(&self) -> Result<String, LoadError>;
}

/// Downloads the CSV over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCsvSource {
    /// Creates a source for the given URL with a default client.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a source for the URL named by `definition`, honouring a
    /// `DATA_URL` environment override.
    #[must_use]
    pub fn from_definition(definition: &DatasetDefinition) -> Self {
        let url = std::env::var("DATA_URL").unwrap_or_else(|_| definition.url.clone());
        Self::new(&url)
    }

    /// The URL this source downloads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OccurrenceSource for HttpCsvSource {
    fn label(&self) -> &str {
        &self.url
    }

    async fn fetch_csv(&self) -> Result<String, LoadError> {
        csv_download::download_csv(&self.client, &self.url).await
    }
}

/// Serves CSV text held in memory.
#[derive(Debug, Clone)]
pub struct StaticCsvSource {
    text: String,
}

impl StaticCsvSource {
    /// Creates a source that always returns `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl OccurrenceSource for StaticCsvSource {
    fn label(&self) -> &str {
        "static"
    }

    async fn fetch_csv(&self) -> Result<String, LoadError> {
        Ok(self.text.clone())
    }
}

/// Fetches and normalizes the table in one step, without caching.
///
/// # Errors
///
/// Returns [`LoadError`] if fetching or normalization fails.
pub async fn load_occurrences(
    source: &dyn OccurrenceSource,
    definition: &DatasetDefinition,
) -> Result<OccurrenceTable, LoadError> {
    log::info!("[{}] Fetching occurrences from {}", definition.id, source.label());
    let text = source.fetch_csv().await?;
    log::debug!("[{}] Fetched {} bytes", definition.id, text.len());
    normalize::normalize_csv(&text, definition)
}
