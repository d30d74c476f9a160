//! Year and classification filter.

use std::collections::{BTreeMap, BTreeSet};

use cenipa_map_dashboard_models::Position;
use cenipa_map_occurrence_models::{Classification, Occurrence, OccurrenceTable};
use chrono::Datelike as _;

/// Borrowed subset of an [`OccurrenceTable`] in source order.
#[derive(Debug, Clone)]
pub struct FilteredOccurrences<'a> {
    rows: Vec<&'a Occurrence>,
}

impl<'a> FilteredOccurrences<'a> {
    /// Number of matching rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the matching rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a Occurrence> + '_ {
        self.rows.iter().copied()
    }

    /// `[longitude, latitude]` of every row with valid coordinates. Rows
    /// without them are skipped.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.rows.iter().filter_map(|row| row.position()).collect()
    }

    /// Number of matching rows per classification.
    #[must_use]
    pub fn count_by_classification(&self) -> BTreeMap<Classification, usize> {
        let mut counts = BTreeMap::new();
        for kind in self.rows.iter().filter_map(|row| row.classification_kind()) {
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    /// Clones the matching rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Occurrence> {
        self.rows.iter().map(|row| (*row).clone()).collect()
    }
}

/// Selects the rows whose date falls in `year` and whose classification is
/// in `classifications`.
///
/// Rows without a parseable date never match. An empty classification set
/// matches nothing.
#[must_use]
pub fn filter<'a>(
    table: &'a OccurrenceTable,
    year: i32,
    classifications: &BTreeSet<Classification>,
) -> FilteredOccurrences<'a> {
    if classifications.is_empty() {
        return FilteredOccurrences { rows: Vec::new() };
    }

    let rows = table
        .rows()
        .iter()
        .filter(|row| row.date.is_some_and(|date| date.year() == year))
        .filter(|row| {
            row.classification_kind()
                .is_some_and(|kind| classifications.contains(&kind))
        })
        .collect();

    FilteredOccurrences { rows }
}
