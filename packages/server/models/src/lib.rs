#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the occurrence map server.
//!
//! The dashboard body itself is a `DashboardView` from
//! `cenipa_map_dashboard_models`; the types here cover query parameters and
//! the small auxiliary endpoints.

use cenipa_map_occurrence_models::Classification;
use serde::{Deserialize, Serialize};

/// Query parameters for the dashboard endpoint.
///
/// Every field is optional; absent fields take the sidebar defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Selected year.
    pub year: Option<String>,
    /// Comma-separated classification labels. Present but empty means no
    /// classification is selected.
    pub classifications: Option<String>,
    /// Whether to include the data table.
    pub show_table: Option<bool>,
}

impl DashboardQueryParams {
    /// Splits the classification list into labels, or `None` when the
    /// parameter was not supplied.
    #[must_use]
    pub fn classification_labels(&self) -> Option<Vec<&str>> {
        self.classifications
            .as_deref()
            .map(|s| s.split(',').map(str::trim).filter(|l| !l.is_empty()).collect())
    }
}

/// A classification option as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClassification {
    /// Canonical label.
    pub name: Classification,
    /// Label used by the source dataset.
    pub source_label: String,
}

impl From<Classification> for ApiClassification {
    fn from(value: Classification) -> Self {
        Self {
            name: value,
            source_label: value.source_label().to_owned(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Whether the occurrence table has been loaded.
    pub data_loaded: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}
