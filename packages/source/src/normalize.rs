//! Normalization of raw CENIPA CSV text into an [`OccurrenceTable`].
//!
//! Columns are located by the names in [`DatasetDefinition::fields`]; all
//! other columns are ignored. Rows keep their source order.

use std::collections::BTreeSet;

use cenipa_map_occurrence_models::{
    Classification, Occurrence, OccurrenceTable, normalize_classification,
};

use crate::LoadError;
use crate::dataset::{DatasetDefinition, FieldMapping};
use crate::parsing::{non_empty, parse_coordinate, parse_count, parse_date_time};

/// Header positions of every required column.
struct ColumnIndex {
    id: usize,
    latitude: usize,
    longitude: usize,
    date: usize,
    time: usize,
    classification: usize,
    kind: usize,
    type_category: usize,
    type_icao: usize,
    aerodrome: usize,
    city: usize,
    status: usize,
    report_number: usize,
    aircraft_involved: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], fields: &FieldMapping) -> Result<Self, LoadError> {
        let missing: Vec<String> = fields
            .required_columns()
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| (*col).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::Schema { missing });
        }

        let find = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();

        Ok(Self {
            id: find(&fields.id),
            latitude: find(&fields.latitude),
            longitude: find(&fields.longitude),
            date: find(&fields.date),
            time: find(&fields.time),
            classification: find(&fields.classification),
            kind: find(&fields.kind),
            type_category: find(&fields.type_category),
            type_icao: find(&fields.type_icao),
            aerodrome: find(&fields.aerodrome),
            city: find(&fields.city),
            status: find(&fields.status),
            report_number: find(&fields.report_number),
            aircraft_involved: find(&fields.aircraft_involved),
        })
    }
}

/// Parses CSV text and normalizes every row.
///
/// Rows whose date/time cannot be parsed are kept with `date: None`. Rows
/// repeating an earlier id are dropped.
///
/// # Errors
///
/// Returns [`LoadError::Schema`] if required columns are missing and
/// [`LoadError::Csv`] if the CSV is malformed.
pub fn normalize_csv(text: &str, definition: &DatasetDefinition) -> Result<OccurrenceTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(definition.delimiter_byte())
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    let columns = ColumnIndex::resolve(&headers, &definition.fields)?;

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut rows: Vec<Occurrence> = Vec::new();
    let mut undated: u64 = 0;
    let mut duplicates: u64 = 0;

    for result in reader.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let id = field(columns.id);
        if id.is_empty() {
            log::warn!("[{}] Skipping row without an occurrence id", definition.id);
            continue;
        }
        if !seen.insert(id.to_owned()) {
            log::warn!("[{}] Dropping duplicate occurrence id {id}", definition.id);
            duplicates += 1;
            continue;
        }

        let date = parse_date_time(
            field(columns.date),
            field(columns.time),
            &definition.date_formats,
        );
        if date.is_none() {
            log::warn!(
                "[{}] Occurrence {id}: unparseable date '{} {}'",
                definition.id,
                field(columns.date),
                field(columns.time)
            );
            undated += 1;
        }

        rows.push(Occurrence {
            id: id.to_owned(),
            latitude: parse_coordinate(field(columns.latitude)),
            longitude: parse_coordinate(field(columns.longitude)),
            date,
            classification: normalize_classification(field(columns.classification)),
            kind: field(columns.kind).to_owned(),
            type_category: field(columns.type_category).to_owned(),
            type_icao: field(columns.type_icao).to_owned(),
            aerodrome: field(columns.aerodrome).to_owned(),
            city: field(columns.city).to_owned(),
            status: field(columns.status).to_owned(),
            report_number: non_empty(field(columns.report_number)),
            aircraft_involved: parse_count(field(columns.aircraft_involved)),
        });
    }

    log::info!(
        "[{}] Normalized {} occurrences ({undated} without a date, {duplicates} duplicate ids dropped)",
        definition.id,
        rows.len()
    );

    let table = OccurrenceTable::new(rows)?;

    for label in unknown_labels(&table) {
        log::warn!(
            "[{}] Classification '{label}' is outside the taxonomy and will never match a filter",
            definition.id
        );
    }

    Ok(table)
}

/// Classification labels in `table` that do not parse into
/// [`Classification`], in order of first appearance.
#[must_use]
pub fn unknown_labels(table: &OccurrenceTable) -> Vec<&str> {
    table
        .classification_labels()
        .into_iter()
        .filter(|label| label.parse::<Classification>().is_err())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, NaiveDate};

    use super::*;
    use crate::dataset;

    const HEADER: &str = "codigo_ocorrencia,ocorrencia_classificacao,ocorrencia_tipo,ocorrencia_tipo_categoria,ocorrencia_tipo_icao,ocorrencia_latitude,ocorrencia_longitude,ocorrencia_cidade,ocorrencia_uf,ocorrencia_pais,ocorrencia_aerodromo,ocorrencia_dia,ocorrencia_horario,investigacao_aeronave_liberada,investigacao_status,divulgacao_relatorio_numero,divulgacao_relatorio_publicado,divulgacao_dia_publicacao,total_recomendacoes,total_aeronaves_envolvidas,ocorrencia_saida_pista,ocorrencia_dia_extracao";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_owned();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn row<'a>(table: &'a OccurrenceTable, id: &str) -> &'a Occurrence {
        table.rows().iter().find(|row| row.id == id).unwrap()
    }

    fn normalize(rows: &[&str]) -> OccurrenceTable {
        normalize_csv(&csv(rows), &dataset::cenipa().unwrap()).unwrap()
    }

    #[test]
    fn normalizes_accident_row() {
        let table = normalize(&[
            "42,ACIDENTE,FALHA DO MOTOR EM VOO,FALHA DO MOTOR EM VOO,SCF-PP,-22.96592,-43.17896,RIO DE JANEIRO,RJ,BRASIL,SBRJ,2015-06-01,10:30:00,SIM,FINALIZADA,A-001/CENIPA/2016,SIM,2016-01-10,2,1,NAO,2018-08-28",
        ]);
        assert_eq!(table.len(), 1);

        let row = &table.rows()[0];
        assert_eq!(row.id, "42");
        assert_eq!(row.classification, "ACCIDENT");
        assert_eq!(
            row.date,
            NaiveDate::from_ymd_opt(2015, 6, 1).and_then(|d| d.and_hms_opt(10, 30, 0))
        );
        assert_eq!(row.kind, "FALHA DO MOTOR EM VOO");
        assert_eq!(row.aerodrome, "SBRJ");
        assert_eq!(row.city, "RIO DE JANEIRO");
        assert_eq!(row.status, "FINALIZADA");
        assert_eq!(row.report_number.as_deref(), Some("A-001/CENIPA/2016"));
        assert_eq!(row.aircraft_involved, 1);
        assert_eq!(row.position(), Some([-43.17896, -22.96592]));
    }

    #[test]
    fn every_known_label_is_normalized() {
        let table = normalize(&[
            "1,INCIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2012-01-01,00:00:00,,ATIVA,,,,0,1,NAO,",
            "2,INCIDENTE GRAVE,T,T,X,-1.0,-40.0,A,UF,BR,****,2013-01-01,00:00:00,,ATIVA,,,,0,1,NAO,",
            "3,ACIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2014-01-01,00:00:00,,ATIVA,,,,0,2,NAO,",
        ]);
        let labels: Vec<&str> = table.rows().iter().map(|r| r.classification.as_str()).collect();
        assert_eq!(labels, vec!["INCIDENT", "SERIOUS INCIDENT", "ACCIDENT"]);
        assert!(table.rows().iter().all(|r| r.classification_kind().is_some()));
        assert!(table.rows().iter().all(|r| r.report_number.is_none()));
    }

    #[test]
    fn keeps_rows_with_unparseable_dates() {
        let table = normalize(&[
            "5,INCIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,not-a-date,10:00:00,,ATIVA,,,,0,1,NAO,",
            "6,INCIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2016-03-04,10:00:00,,ATIVA,,,,0,1,NAO,",
        ]);
        assert_eq!(table.len(), 2);
        assert!(row(&table, "5").date.is_none());
        assert_eq!(row(&table, "6").date.unwrap().year(), 2016);
    }

    #[test]
    fn missing_coordinates_become_none() {
        let table = normalize(&[
            "8,ACIDENTE,T,T,X,,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
        ]);
        let occurrence = row(&table, "8");
        assert!(occurrence.latitude.is_none());
        assert!(occurrence.position().is_none());
    }

    #[test]
    fn drops_duplicate_ids_keeping_first() {
        let table = normalize(&[
            "9,ACIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
            "9,INCIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(row(&table, "9").classification, "ACCIDENT");
    }

    #[test]
    fn reports_missing_columns() {
        let err = normalize_csv(
            "codigo_ocorrencia,ocorrencia_dia\n1,2015-01-01\n",
            &dataset::cenipa().unwrap(),
        )
        .unwrap_err();
        let LoadError::Schema { missing } = err else {
            panic!("expected schema error");
        };
        assert!(missing.contains(&"ocorrencia_classificacao".to_owned()));
        assert!(missing.contains(&"ocorrencia_horario".to_owned()));
        assert!(!missing.contains(&"codigo_ocorrencia".to_owned()));
    }

    #[test]
    fn lists_labels_outside_the_taxonomy() {
        let table = normalize(&[
            "1,ACIDENTE,T,T,X,-1.0,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
            "2,OCORRENCIA DE SOLO,T,T,X,-1.0,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
            "3,OCORRENCIA DE SOLO,T,T,X,-1.0,-40.0,A,UF,BR,****,2015-01-01,10:00:00,,ATIVA,,,,0,1,NAO,",
        ]);
        assert_eq!(table.len(), 3);
        assert_eq!(unknown_labels(&table), vec!["OCORRENCIA DE SOLO"]);
    }
}
