//! Config-driven dataset definition.
//!
//! The CENIPA dataset's URL, column names, and accepted date formats live in
//! `packages/source/sources/cenipa.toml`, baked into the binary at compile
//! time via [`include_str!`].

use serde::Deserialize;

use crate::LoadError;

/// The embedded CENIPA dataset definition.
const CENIPA_TOML: &str = include_str!("../sources/cenipa.toml");

/// Everything needed to fetch and normalize the occurrence CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"cenipa"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// URL of the CSV file.
    pub url: String,
    /// Markdown attribution shown alongside the data.
    #[serde(default)]
    pub attribution: String,
    /// Field delimiter (default: comma).
    #[serde(default)]
    pub delimiter: Option<String>,
    /// `chrono` formats tried in order against `"{date} {time}"`.
    pub date_formats: Vec<String>,
    /// Source column names for each semantic field.
    pub fields: FieldMapping,
}

impl DatasetDefinition {
    /// Returns the delimiter byte, defaulting to `,`.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }
}

/// Maps each semantic field to its source column name.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Unique occurrence identifier column.
    pub id: String,
    /// Latitude column.
    pub latitude: String,
    /// Longitude column.
    pub longitude: String,
    /// Calendar date column.
    pub date: String,
    /// Time-of-day column, joined to `date` with a space.
    pub time: String,
    /// Classification label column.
    pub classification: String,
    /// Occurrence type column.
    #[serde(rename = "type")]
    pub kind: String,
    /// Occurrence type category column.
    pub type_category: String,
    /// ICAO occurrence type column.
    pub type_icao: String,
    /// Aerodrome column.
    pub aerodrome: String,
    /// City column.
    pub city: String,
    /// Investigation status column.
    pub status: String,
    /// Report number column.
    pub report_number: String,
    /// Aircraft involved count column.
    pub aircraft_involved: String,
}

impl FieldMapping {
    /// Every source column the loader requires, identifier first.
    #[must_use]
    pub fn required_columns(&self) -> [&str; 14] {
        [
            self.id.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.classification.as_str(),
            self.kind.as_str(),
            self.type_category.as_str(),
            self.type_icao.as_str(),
            self.aerodrome.as_str(),
            self.city.as_str(),
            self.status.as_str(),
            self.report_number.as_str(),
            self.aircraft_involved.as_str(),
        ]
    }
}

/// Parses a dataset definition from TOML text.
///
/// # Errors
///
/// Returns [`LoadError::Definition`] if the TOML is malformed or missing
/// fields.
pub fn parse_dataset_toml(text: &str) -> Result<DatasetDefinition, LoadError> {
    Ok(toml::from_str(text)?)
}

/// Returns the embedded CENIPA dataset definition.
///
/// # Errors
///
/// Returns [`LoadError::Definition`] if the embedded TOML is invalid.
pub fn cenipa() -> Result<DatasetDefinition, LoadError> {
    parse_dataset_toml(CENIPA_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_definition_parses() {
        let def = cenipa().unwrap();
        assert_eq!(def.id, "cenipa");
        assert!(def.url.ends_with("ocorrencias_aviacao.csv"));
        assert_eq!(def.delimiter_byte(), b',');
        assert_eq!(def.fields.id, "codigo_ocorrencia");
        assert_eq!(def.fields.kind, "ocorrencia_tipo");
        assert!(!def.date_formats.is_empty());
    }

    #[test]
    fn required_columns_are_distinct() {
        let def = cenipa().unwrap();
        let cols = def.fields.required_columns();
        let mut sorted = cols.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), cols.len());
    }

    #[test]
    fn rejects_definition_without_fields() {
        let err = parse_dataset_toml("id = \"x\"\nname = \"x\"\nurl = \"x\"\ndate_formats = []")
            .unwrap_err();
        assert!(matches!(err, LoadError::Definition(_)));
    }
}
