#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Occurrence filtering, sidebar state, and view composition.
//!
//! Everything here is a pure function of the loaded
//! [`OccurrenceTable`](cenipa_map_occurrence_models::OccurrenceTable) and
//! the current [`SidebarState`]. Host runtimes (the HTTP server, the CLI)
//! call [`render`] once per input change.

pub mod filter;
pub mod sidebar;
pub mod views;

pub use filter::{FilteredOccurrences, filter};
pub use sidebar::SidebarState;
pub use views::render;

/// Invalid user input at the dashboard boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The year is outside the slider range.
    #[error("year {year} is outside the range {min}-{max}")]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
        /// Smallest allowed year.
        min: i32,
        /// Largest allowed year.
        max: i32,
    },

    /// The year could not be parsed as an integer.
    #[error("invalid year '{0}'")]
    InvalidYear(String),

    /// The classification label is not one of the known values.
    #[error("unknown classification '{0}'")]
    UnknownClassification(String),
}
