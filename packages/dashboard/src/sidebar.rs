//! Sidebar controls: year slider, classification multiselect, and table
//! toggle.

use std::collections::BTreeSet;

use cenipa_map_dashboard_models::{
    ClassificationControl, ClassificationCount, SidebarView, YearControl,
};
use cenipa_map_occurrence_models::Classification;

use crate::InputError;
use crate::filter::FilteredOccurrences;

/// Smallest year the slider allows.
pub const MIN_YEAR: i32 = 2008;
/// Largest year the slider allows.
pub const MAX_YEAR: i32 = 2018;
/// Year selected at session start.
pub const DEFAULT_YEAR: i32 = 2015;
/// Classifications selected at session start.
pub const DEFAULT_CLASSIFICATIONS: &[Classification] =
    &[Classification::Incident, Classification::Accident];

/// Session-scoped user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    year: i32,
    classifications: BTreeSet<Classification>,
    show_table: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            classifications: DEFAULT_CLASSIFICATIONS.iter().copied().collect(),
            show_table: false,
        }
    }
}

impl SidebarState {
    /// Selected year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Selected classifications.
    #[must_use]
    pub const fn classifications(&self) -> &BTreeSet<Classification> {
        &self.classifications
    }

    /// Whether the data table is shown.
    #[must_use]
    pub const fn show_table(&self) -> bool {
        self.show_table
    }

    /// Moves the year slider.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::YearOutOfRange`] outside `MIN_YEAR..=MAX_YEAR`.
    pub fn with_year(mut self, year: i32) -> Result<Self, InputError> {
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(InputError::YearOutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        self.year = year;
        Ok(self)
    }

    /// Parses and applies a year typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidYear`] if `raw` is not an integer, or
    /// [`InputError::YearOutOfRange`] if it is outside the slider range.
    pub fn with_year_str(self, raw: &str) -> Result<Self, InputError> {
        let year = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| InputError::InvalidYear(raw.to_owned()))?;
        self.with_year(year)
    }

    /// Replaces the classification selection.
    #[must_use]
    pub fn with_classifications(
        mut self,
        classifications: impl IntoIterator<Item = Classification>,
    ) -> Self {
        self.classifications = classifications.into_iter().collect();
        self
    }

    /// Replaces the classification selection from labels such as
    /// `"SERIOUS INCIDENT"`. Empty labels are ignored, so an empty list
    /// clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownClassification`] for the first label
    /// outside the taxonomy.
    pub fn with_classification_labels<'a>(
        self,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, InputError> {
        let parsed = labels
            .into_iter()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(|label| {
                label
                    .parse::<Classification>()
                    .map_err(|_| InputError::UnknownClassification(label.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_classifications(parsed))
    }

    /// Sets the table toggle.
    #[must_use]
    pub fn with_show_table(mut self, show_table: bool) -> Self {
        self.show_table = show_table;
        self
    }

    /// Renders the sidebar for the filtered `subset`.
    #[must_use]
    pub fn view(&self, subset: &FilteredOccurrences<'_>, attribution: &str) -> SidebarView {
        let by_classification = subset.count_by_classification();

        SidebarView {
            header: "Parameters".to_owned(),
            info: info_text(subset.len()),
            selected_count: subset.len(),
            year: YearControl {
                min: MIN_YEAR,
                max: MAX_YEAR,
                value: self.year,
            },
            classifications: ClassificationControl {
                options: Classification::all().to_vec(),
                selected: self.classifications.iter().copied().collect(),
            },
            counts: self
                .classifications
                .iter()
                .map(|classification| ClassificationCount {
                    classification: *classification,
                    count: by_classification.get(classification).copied().unwrap_or(0),
                })
                .collect(),
            show_table: self.show_table,
            attribution: attribution.to_owned(),
        }
    }
}

/// The info readout for `count` matched rows.
#[must_use]
pub fn info_text(count: usize) -> String {
    format!("{count} selected occurrences.")
}
