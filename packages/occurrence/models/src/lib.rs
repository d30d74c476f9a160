#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aeronautical occurrence record and classification taxonomy types.
//!
//! CENIPA publishes occurrences with Portuguese classification labels. The
//! loader translates them into the [`Classification`] taxonomy defined here
//! and stores each row as an [`Occurrence`] inside an immutable
//! [`OccurrenceTable`].

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity classification of an aeronautical occurrence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Classification {
    /// An occurrence that affected or could have affected operational safety.
    #[serde(rename = "INCIDENT")]
    #[strum(serialize = "INCIDENT")]
    Incident,
    /// An incident in which an accident very nearly happened.
    #[serde(rename = "SERIOUS INCIDENT")]
    #[strum(serialize = "SERIOUS INCIDENT")]
    SeriousIncident,
    /// An occurrence with serious injury, death, or substantial aircraft
    /// damage.
    #[serde(rename = "ACCIDENT")]
    #[strum(serialize = "ACCIDENT")]
    Accident,
}

impl Classification {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Incident, Self::SeriousIncident, Self::Accident]
    }

    /// Returns the Portuguese label CENIPA uses for this classification.
    #[must_use]
    pub const fn source_label(self) -> &'static str {
        match self {
            Self::Incident => "INCIDENTE",
            Self::SeriousIncident => "INCIDENTE GRAVE",
            Self::Accident => "ACIDENTE",
        }
    }

    /// Maps a CENIPA source label to its classification, if it is one of
    /// the three known labels.
    #[must_use]
    pub fn from_source_label(raw: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.source_label() == raw)
    }
}

/// Translates a raw classification label into the canonical English label.
///
/// Unknown labels pass through unchanged, so applying this to an already
/// normalized label is a no-op.
#[must_use]
pub fn normalize_classification(raw: &str) -> String {
    let trimmed = raw.trim();
    Classification::from_source_label(trimmed)
        .map_or_else(|| trimmed.to_owned(), |c| c.to_string())
}

/// One normalized occurrence row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Occurrence code from the source dataset.
    pub id: String,
    /// Latitude (WGS84). `None` if missing or unparseable.
    pub latitude: Option<f64>,
    /// Longitude (WGS84). `None` if missing or unparseable.
    pub longitude: Option<f64>,
    /// Date and time of the occurrence. `None` when the source date/time
    /// pair could not be parsed.
    pub date: Option<NaiveDateTime>,
    /// Normalized classification label (see [`normalize_classification`]).
    pub classification: String,
    /// Occurrence type (e.g. "FALHA DO MOTOR EM VOO").
    #[serde(rename = "type")]
    pub kind: String,
    /// Broader type category.
    pub type_category: String,
    /// ICAO taxonomy code for the occurrence type.
    pub type_icao: String,
    /// Aerodrome ICAO code or name.
    pub aerodrome: String,
    /// City where the occurrence happened.
    pub city: String,
    /// Investigation status.
    pub status: String,
    /// Published report number, if any.
    pub report_number: Option<String>,
    /// Number of aircraft involved.
    pub aircraft_involved: u32,
}

impl Occurrence {
    /// Parses the normalized classification label into the taxonomy.
    /// Returns `None` for labels outside the three known values.
    #[must_use]
    pub fn classification_kind(&self) -> Option<Classification> {
        self.classification.parse().ok()
    }

    /// Returns `[longitude, latitude]` when both coordinates are present,
    /// finite, and within WGS84 bounds.
    #[must_use]
    pub fn position(&self) -> Option<[f64; 2]> {
        let latitude = self.latitude?;
        let longitude = self.longitude?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some([longitude, latitude])
    }
}

/// Column names of an [`Occurrence`] in display order (identifier first).
pub const OCCURRENCE_COLUMNS: &[&str] = &[
    "id",
    "latitude",
    "longitude",
    "date",
    "classification",
    "type",
    "type_category",
    "type_icao",
    "aerodrome",
    "city",
    "status",
    "report_number",
    "aircraft_involved",
];

/// Error returned when building an [`OccurrenceTable`] from rows that
/// repeat an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdError {
    /// The repeated occurrence id.
    pub id: String,
}

impl std::fmt::Display for DuplicateIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate occurrence id {}", self.id)
    }
}

impl std::error::Error for DuplicateIdError {}

/// Immutable, normalized occurrence table in source order.
///
/// Ids are unique across the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OccurrenceTable {
    rows: Vec<Occurrence>,
}

impl OccurrenceTable {
    /// Builds a table from rows, rejecting repeated ids.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdError`] for the first id that appears twice.
    pub fn new(rows: Vec<Occurrence>) -> Result<Self, DuplicateIdError> {
        let mut seen = BTreeSet::new();
        for row in &rows {
            if !seen.insert(row.id.as_str()) {
                return Err(DuplicateIdError { id: row.id.clone() });
            }
        }
        Ok(Self { rows })
    }

    /// All rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Occurrence] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct classification labels present in the table, in order of
    /// first appearance.
    #[must_use]
    pub fn classification_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.classification.as_str()) {
                labels.push(row.classification.as_str());
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(id: &str, classification: &str) -> Occurrence {
        Occurrence {
            id: id.to_owned(),
            latitude: Some(-22.9),
            longitude: Some(-43.1),
            date: None,
            classification: classification.to_owned(),
            kind: String::new(),
            type_category: String::new(),
            type_icao: String::new(),
            aerodrome: String::new(),
            city: String::new(),
            status: String::new(),
            report_number: None,
            aircraft_involved: 1,
        }
    }

    #[test]
    fn translates_source_labels() {
        assert_eq!(normalize_classification("INCIDENTE GRAVE"), "SERIOUS INCIDENT");
        assert_eq!(normalize_classification("INCIDENTE"), "INCIDENT");
        assert_eq!(normalize_classification("ACIDENTE"), "ACCIDENT");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["INCIDENTE GRAVE", "INCIDENTE", "ACIDENTE", "OUTRO"] {
            let once = normalize_classification(raw);
            assert_eq!(normalize_classification(&once), once);
        }
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(normalize_classification("OCORRENCIA DE SOLO"), "OCORRENCIA DE SOLO");
    }

    #[test]
    fn classification_string_roundtrip() {
        for c in Classification::all() {
            let parsed: Classification = c.to_string().parse().unwrap();
            assert_eq!(parsed, *c);
        }
        assert_eq!(
            serde_json::to_string(&Classification::SeriousIncident).unwrap(),
            "\"SERIOUS INCIDENT\""
        );
    }

    #[test]
    fn position_requires_valid_coordinates() {
        let mut row = occurrence("1", "ACCIDENT");
        assert_eq!(row.position(), Some([-43.1, -22.9]));

        row.latitude = None;
        assert!(row.position().is_none());

        row.latitude = Some(f64::NAN);
        assert!(row.position().is_none());

        row.latitude = Some(95.0);
        assert!(row.position().is_none());
    }

    #[test]
    fn table_rejects_duplicate_ids() {
        let err = OccurrenceTable::new(vec![
            occurrence("7", "INCIDENT"),
            occurrence("7", "ACCIDENT"),
        ])
        .unwrap_err();
        assert_eq!(err.id, "7");
    }

    #[test]
    fn classification_labels_keep_first_appearance_order() {
        let table = OccurrenceTable::new(vec![
            occurrence("1", "ACCIDENT"),
            occurrence("2", "INCIDENT"),
            occurrence("3", "ACCIDENT"),
        ])
        .unwrap();
        assert_eq!(table.classification_labels(), vec!["ACCIDENT", "INCIDENT"]);
        assert_eq!(
            table.rows()[1].classification_kind(),
            Some(Classification::Incident)
        );
    }
}
